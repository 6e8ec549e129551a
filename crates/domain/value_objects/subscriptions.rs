use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::subscriptions::{
        InsertSubscriptionEntity, SubscriptionEntity, UpdateSubscriptionEntity,
    },
    errors::ValidationError,
    value_objects::{billing_window::BillingWindow, calendar_month::CalendarMonth},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionModel {
    pub id: i64,
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: CalendarMonth,
    pub end_date: Option<CalendarMonth>,
}

impl From<SubscriptionEntity> for SubscriptionModel {
    fn from(entity: SubscriptionEntity) -> Self {
        Self {
            id: entity.id,
            service_name: entity.service_name,
            price: entity.price,
            user_id: entity.user_id,
            start_date: CalendarMonth::from(entity.start_date),
            end_date: entity.end_date.map(CalendarMonth::from),
        }
    }
}

/// Request body for creating a subscription. Dates arrive as raw `MM-YYYY`
/// strings and are checked in `to_entity`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsertSubscriptionModel {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl InsertSubscriptionModel {
    pub fn to_entity(&self) -> Result<InsertSubscriptionEntity, ValidationError> {
        require_non_empty("user_id", &self.user_id)?;
        let fields = SubscriptionFields::validate(
            &self.service_name,
            self.price,
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )?;

        Ok(InsertSubscriptionEntity {
            service_name: self.service_name.clone(),
            price: self.price,
            user_id: self.user_id.clone(),
            start_date: fields.start_date.first_day(),
            end_date: fields.end_date.map(|end| end.first_day()),
        })
    }
}

/// Request body for replacing a subscription. `user_id` scopes the update to
/// its owner and is not itself changed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateSubscriptionModel {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl UpdateSubscriptionModel {
    pub fn to_entity(&self) -> Result<UpdateSubscriptionEntity, ValidationError> {
        require_non_empty("user_id", &self.user_id)?;
        let fields = SubscriptionFields::validate(
            &self.service_name,
            self.price,
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )?;

        Ok(UpdateSubscriptionEntity {
            service_name: self.service_name.clone(),
            price: self.price,
            start_date: fields.start_date.first_day(),
            end_date: fields.end_date.map(|end| end.first_day()),
        })
    }
}

struct SubscriptionFields {
    start_date: CalendarMonth,
    end_date: Option<CalendarMonth>,
}

impl SubscriptionFields {
    fn validate(
        service_name: &str,
        price: i64,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Self, ValidationError> {
        require_non_empty("service_name", service_name)?;
        if price < 0 {
            return Err(ValidationError::NegativePrice(price));
        }

        let start_date = start_date
            .ok_or(ValidationError::MissingField("start_date"))
            .and_then(CalendarMonth::parse)?;
        let end_date = end_date.map(CalendarMonth::parse).transpose()?;

        if end_date.is_some_and(|end| end < start_date) {
            return Err(ValidationError::EndBeforeStart);
        }

        Ok(Self {
            start_date,
            end_date,
        })
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SumSubscriptionsModel {
    pub user_id: String,
    pub start_date: String,
    pub end_date: String,
}

impl SumSubscriptionsModel {
    pub fn to_window(&self) -> Result<BillingWindow, ValidationError> {
        require_non_empty("user_id", &self.user_id)?;
        let start = CalendarMonth::parse(&self.start_date)?;
        let end = CalendarMonth::parse(&self.end_date)?;
        BillingWindow::new(start, end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionSumDto {
    pub user_id: String,
    pub current_sum: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateSubscriptionDto {
    pub result: String,
    pub subscription_id: i64,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn insert_model(start: Option<&str>, end: Option<&str>) -> InsertSubscriptionModel {
        InsertSubscriptionModel {
            service_name: "Yandex Plus".to_string(),
            price: 400,
            user_id: "60601fee-2bf1-4721-ae6f-7636e79a0cba".to_string(),
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
        }
    }

    #[test]
    fn insert_model_stores_first_day_of_months() {
        let entity = insert_model(Some("07-2025"), Some("09-2025"))
            .to_entity()
            .unwrap();
        assert_eq!(entity.start_date, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(entity.end_date, NaiveDate::from_ymd_opt(2025, 9, 1));
        assert_eq!(entity.price, 400);
    }

    #[test]
    fn insert_model_allows_open_ended_subscription() {
        let entity = insert_model(Some("07-2025"), None).to_entity().unwrap();
        assert_eq!(entity.end_date, None);
    }

    #[test]
    fn insert_model_requires_start_date() {
        assert_eq!(
            insert_model(None, None).to_entity(),
            Err(ValidationError::MissingField("start_date"))
        );
    }

    #[test]
    fn insert_model_rejects_bad_fields() {
        assert_eq!(
            insert_model(Some("2025-07"), None).to_entity(),
            Err(ValidationError::InvalidDate("2025-07".to_string()))
        );
        assert_eq!(
            insert_model(Some("07-2025"), Some("06-2025")).to_entity(),
            Err(ValidationError::EndBeforeStart)
        );

        let mut negative = insert_model(Some("07-2025"), None);
        negative.price = -1;
        assert_eq!(negative.to_entity(), Err(ValidationError::NegativePrice(-1)));

        let mut unnamed = insert_model(Some("07-2025"), None);
        unnamed.service_name = "   ".to_string();
        assert_eq!(
            unnamed.to_entity(),
            Err(ValidationError::MissingField("service_name"))
        );
    }

    #[test]
    fn service_name_is_stored_verbatim() {
        let mut padded = insert_model(Some("07-2025"), None);
        padded.service_name = " Yandex Plus ".to_string();
        assert_eq!(padded.to_entity().unwrap().service_name, " Yandex Plus ");

        let update = UpdateSubscriptionModel {
            service_name: "\tYandex Plus".to_string(),
            price: 400,
            user_id: "60601fee-2bf1-4721-ae6f-7636e79a0cba".to_string(),
            start_date: Some("07-2025".to_string()),
            end_date: None,
        };
        assert_eq!(update.to_entity().unwrap().service_name, "\tYandex Plus");
    }

    #[test]
    fn update_model_can_clear_end_date() {
        let model = UpdateSubscriptionModel {
            service_name: "Netflix".to_string(),
            price: 1299,
            user_id: "user123".to_string(),
            start_date: Some("01-2023".to_string()),
            end_date: None,
        };
        let entity = model.to_entity().unwrap();
        assert_eq!(entity.end_date, None);
        assert_eq!(entity.service_name, "Netflix");
    }

    #[test]
    fn sum_model_builds_window() {
        let model = SumSubscriptionsModel {
            user_id: "user123".to_string(),
            start_date: "01-2023".to_string(),
            end_date: "06-2023".to_string(),
        };
        let window = model.to_window().unwrap();
        assert_eq!(window.start().to_string(), "01-2023");
        assert_eq!(window.end().to_string(), "06-2023");

        let inverted = SumSubscriptionsModel {
            end_date: "12-2022".to_string(),
            ..model
        };
        assert_eq!(inverted.to_window(), Err(ValidationError::InvertedWindow));
    }

    #[test]
    fn model_serializes_wire_dates() {
        let model = SubscriptionModel::from(SubscriptionEntity {
            id: 3,
            service_name: "Spotify".to_string(),
            price: 299,
            user_id: "user123".to_string(),
            start_date: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
            end_date: None,
        });
        assert_eq!(
            serde_json::to_value(&model).unwrap(),
            serde_json::json!({
                "id": 3,
                "service_name": "Spotify",
                "price": 299,
                "user_id": "user123",
                "start_date": "02-2023",
                "end_date": null,
            })
        );
    }
}
