use serde::{Deserialize, Serialize};

use crate::domain::value_objects::subscriptions::SubscriptionModel;

/// Forward-only cursor over a user's subscriptions, ascending by id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ListSubscriptionsFilter {
    /// Exclusive: only ids strictly greater than this are returned.
    pub after_id: Option<i64>,
    pub limit: Option<i64>,
}

impl ListSubscriptionsFilter {
    /// Page size cap, `None` when unbounded. Zero and negative limits mean unbounded.
    pub fn page_size(&self) -> Option<i64> {
        self.limit.filter(|limit| *limit > 0)
    }

    pub fn admits(&self, id: i64) -> bool {
        self.after_id.is_none_or(|after_id| id > after_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionPageDto {
    pub data: Vec<SubscriptionModel>,
    pub next_after_id: Option<i64>,
}

impl From<Vec<SubscriptionModel>> for SubscriptionPageDto {
    fn from(data: Vec<SubscriptionModel>) -> Self {
        let next_after_id = data.last().map(|subscription| subscription.id);
        Self {
            data,
            next_after_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::calendar_month::CalendarMonth;

    fn model(id: i64) -> SubscriptionModel {
        SubscriptionModel {
            id,
            service_name: "Netflix".to_string(),
            price: 999,
            user_id: "user-1".to_string(),
            start_date: CalendarMonth::new(2023, 1).unwrap(),
            end_date: None,
        }
    }

    #[test]
    fn non_positive_limits_are_unbounded() {
        let unbounded = [None, Some(0), Some(-5)];
        for limit in unbounded {
            let filter = ListSubscriptionsFilter {
                after_id: None,
                limit,
            };
            assert_eq!(filter.page_size(), None);
        }

        let filter = ListSubscriptionsFilter {
            after_id: None,
            limit: Some(3),
        };
        assert_eq!(filter.page_size(), Some(3));
    }

    #[test]
    fn cursor_is_exclusive() {
        let filter = ListSubscriptionsFilter {
            after_id: Some(4),
            limit: None,
        };
        assert!(!filter.admits(3));
        assert!(!filter.admits(4));
        assert!(filter.admits(5));
        assert!(ListSubscriptionsFilter::default().admits(1));
    }

    #[test]
    fn next_cursor_is_last_id_of_page() {
        let page = SubscriptionPageDto::from(vec![model(2), model(7)]);
        assert_eq!(page.next_after_id, Some(7));

        let empty = SubscriptionPageDto::from(Vec::new());
        assert_eq!(empty.next_after_id, None);
        assert_eq!(
            serde_json::to_value(&empty).unwrap(),
            serde_json::json!({ "data": [], "next_after_id": null })
        );
    }
}
