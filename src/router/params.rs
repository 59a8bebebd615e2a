#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub key: String,
    pub value: String,
}

impl Param {
    pub fn new(key: &str, value: &str) -> Param {
        Param {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Path parameters bound by a matched route, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<Param>);

impl Params {
    /// Empty `Params`
    pub fn new() -> Params {
        Params(Vec::new())
    }

    /// Returns the value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|param| param.key == name)
            .map(|param| param.value.as_str())
    }

    /// Binds `key` to `value`, replacing an earlier binding of the same key.
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.0.iter_mut().find(|param| param.key == key) {
            Some(param) => param.value = value.to_string(),
            None => self.0.push(Param::new(key, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_keys_unique() {
        let mut params = Params::new();
        params.insert("name", "bob");
        params.insert("age", "18");
        params.insert("name", "alice");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("name"), Some("alice"));
        assert_eq!(params.get("age"), Some("18"));
        assert_eq!(params.get("missing"), None);
    }
}
