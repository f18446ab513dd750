use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct CategoryDoc {
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDoc {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: Option<String>,
    /// RFC 3339 timestamp; defaults to now when omitted
    pub date: Option<String>,
    pub categories: Vec<CategoryDoc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPageDoc {
    pub content: Vec<ProductDoc>,
    pub number: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
    pub number_of_elements: u64,
    pub empty: bool,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPageDoc {
    pub content: Vec<CategoryDoc>,
    pub number: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
    pub number_of_elements: u64,
    pub empty: bool,
}

#[derive(ToSchema)]
pub struct ErrorBody {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub message: Option<String>,
    pub path: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::products::find_all,
        crate::routes::products::find_by_id,
        crate::routes::products::insert,
        crate::routes::products::update,
        crate::routes::products::delete,
        crate::routes::categories::find_all,
        crate::routes::categories::find_by_id,
        crate::routes::categories::insert,
        crate::routes::categories::update,
        crate::routes::categories::delete,
    ),
    components(
        schemas(
            HealthResponse,
            CategoryDoc,
            ProductDoc,
            ProductPageDoc,
            CategoryPageDoc,
            ErrorBody,
        )
    ),
    tags(
        (name = "health"),
        (name = "products"),
        (name = "categories")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_catalog_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in ["/health", "/products", "/products/{id}", "/categories", "/categories/{id}"] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {expected}");
        }
    }
}
