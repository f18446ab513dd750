use chrono::{DateTime, Utc};

/// Category as the persistence layer hands it out.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self { Self { id: None, name: name.into() } }
}

/// Product aggregate. `id` is `None` until the repository assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: String,
    pub date: DateTime<Utc>,
    categories: Vec<Category>,
}

impl Product {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64, img_url: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            img_url: img_url.into(),
            date,
            categories: Vec::new(),
        }
    }

    pub fn categories(&self) -> &[Category] { &self.categories }

    /// Category ids of persisted members, in insertion order.
    pub fn category_ids(&self) -> Vec<i64> { self.categories.iter().filter_map(|c| c.id).collect() }

    /// Replace the category set. Duplicate ids collapse to the first occurrence.
    pub fn set_categories(&mut self, categories: impl IntoIterator<Item = Category>) {
        self.categories.clear();
        for c in categories {
            let duplicate = c.id.is_some() && self.categories.iter().any(|e| e.id == c.id);
            if !duplicate {
                self.categories.push(c);
            }
        }
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.set_categories(categories);
        self
    }
}
