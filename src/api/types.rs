use serde::Deserialize;
use validator::Validate;

/// `?page=` of a list. Kept as text: a malformed value selects page 1
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, Validate, utoipa::IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub(crate) struct PageParams {
    /// 1-based page number
    #[param(example = "2")]
    pub(crate) page: Option<String>,
}

impl PageParams {
    pub(crate) fn raw_page(&self) -> Option<&str> {
        self.page.as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, utoipa::IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub(crate) struct SearchParams {
    /// Text to look for in title and description
    #[validate(length(max = 200))]
    #[param(max_length = 200, example = "cake")]
    pub(crate) q: Option<String>,
    /// 1-based page number
    pub(crate) page: Option<String>,
}

impl SearchParams {
    /// The trimmed search term, `None` when blank.
    pub(crate) fn term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_term() {
        let params = SearchParams {
            q: Some("   ".to_string()),
            page: None,
        };
        assert_eq!(params.term(), None);
        let params = SearchParams {
            q: Some(" cake ".to_string()),
            page: None,
        };
        assert_eq!(params.term(), Some("cake"));
    }

    #[test]
    fn long_search_term_is_invalid() {
        let params = SearchParams {
            q: Some("x".repeat(201)),
            page: None,
        };
        assert!(params.validate().is_err());
    }
}
