//! Extractors whose rejections render through [`ApiError`], so malformed
//! bodies, ids and query strings all answer 400 with the usual error body.

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use serde::Deserialize;
use service::pagination::{PageRequest, DEFAULT_PAGE, DEFAULT_SIZE};

use crate::errors::ApiError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// `?page=&size=` with the usual defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageQuery {
    pub fn into_request(self) -> Result<PageRequest, ApiError> {
        Ok(PageRequest::new(self.page.unwrap_or(DEFAULT_PAGE), self.size.unwrap_or(DEFAULT_SIZE))?)
    }
}

/// One element of an association body. The older field names are accepted too.
#[derive(Debug, Deserialize)]
pub struct IdRef {
    #[serde(alias = "activities_id", alias = "activitiesId", alias = "group_id", alias = "groupId")]
    pub id: i32,
}

pub fn ids(refs: &[IdRef]) -> Vec<i32> {
    refs.iter().map(|r| r.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_ref_accepts_legacy_names() {
        let refs: Vec<IdRef> = serde_json::from_str(r#"[{"id":1},{"activities_id":2},{"groupId":3}]"#).unwrap();
        assert_eq!(ids(&refs), vec![1, 2, 3]);
    }

    #[test]
    fn page_query_defaults_and_bounds() {
        let req = PageQuery::default().into_request().unwrap();
        assert_eq!((req.page, req.size), (0, 10));
        assert!(PageQuery { page: Some(-1), size: None }.into_request().is_err());
        assert!(PageQuery { page: None, size: Some(0) }.into_request().is_err());
    }
}
