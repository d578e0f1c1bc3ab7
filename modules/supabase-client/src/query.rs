/// PostgREST query parameters, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.params.push((column.to_string(), format!("eq.{value}")));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.params.push(("order".to_string(), format!("{column}.desc")));
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.params.push(("limit".to_string(), n.to_string()));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_postgrest_params() {
        let q = Query::new()
            .select("*,profiles(nickname,role)")
            .eq("id", "42")
            .order_desc("created_at")
            .limit(1);
        let pairs: Vec<(&str, &str)> = q
            .params()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("select", "*,profiles(nickname,role)"),
                ("id", "eq.42"),
                ("order", "created_at.desc"),
                ("limit", "1"),
            ]
        );
    }
}
