use serde::Deserialize;

use crate::catalog::SoundFilter;

/// Query string of `GET /sounds`. Values stay raw strings so that
/// anything other than `true` reads as `false` instead of failing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub category: Option<String>,
    pub is_premium: Option<String>,
    pub is_active: Option<String>,
}

impl From<ListQuery> for SoundFilter {
    fn from(query: ListQuery) -> Self {
        SoundFilter {
            category: query.category.filter(|c| !c.is_empty()),
            is_premium: query.is_premium.map(|p| p == "true"),
            is_active: query.is_active.map(|a| a == "true"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::ListQuery;
    use crate::catalog::SoundFilter;

    #[test]
    fn flags_are_true_only_for_true() {
        let query = ListQuery {
            category: Some(String::new()),
            is_premium: Some("yes".to_owned()),
            is_active: Some("true".to_owned()),
        };

        assert_eq!(
            SoundFilter::from(query),
            SoundFilter {
                category: None,
                is_premium: Some(false),
                is_active: Some(true),
            }
        );

        assert_eq!(SoundFilter::from(ListQuery::default()), SoundFilter::default());
    }
}
