use serde::{Deserialize, Serialize};

/// Respuesta paginada de los listados
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    /// Total de páginas; si la API no lo informa se calcula
    pub fn pages(&self) -> u32 {
        if self.total_pages > 0 || self.limit == 0 {
            return self.total_pages;
        }
        ((self.total + self.limit as u64 - 1) / self.limit as u64) as u32
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages()
    }
}

/// Respuesta de existencia de número OT
#[derive(Debug, Clone, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pages_computed_when_missing() {
        let page: PaginatedResponse<u32> = serde_json::from_value(json!({
            "data": [1, 2, 3],
            "total": 23,
            "page": 1,
            "limit": 10
        }))
        .unwrap();
        assert_eq!(page.pages(), 3);
        assert!(page.has_next());
    }

    #[test]
    fn test_last_page() {
        let page = PaginatedResponse::<u32> { data: vec![], total: 20, page: 2, limit: 10, total_pages: 2 };
        assert!(!page.has_next());
    }
}
