use heck::{ToSnakeCase, ToUpperCamelCase};

/// A model or association name, split into lowercase words.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Name {
    pub parts: Vec<String>,
}

impl Name {
    pub fn new(src: &str) -> Self {
        let snake = src.to_snake_case();
        let parts = snake.split('_').map(String::from).collect();
        Self { parts }
    }

    pub fn snake_case(&self) -> String {
        self.parts.join("_")
    }

    pub fn upper_camel_case(&self) -> String {
        self.snake_case().to_upper_camel_case()
    }

    /// Conventional foreign key column referencing a model or association
    /// with this name, e.g. `user_id` for `User`.
    pub fn foreign_key(&self) -> String {
        format!("{}_id", self.snake_case())
    }
}
