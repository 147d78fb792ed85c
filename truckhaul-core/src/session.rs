//! Authenticated user identity passed into a workflow.

use serde::{Deserialize, Serialize};

use crate::config::WorkflowConfig;
use crate::model::{CustomerInfo, ResolvedArea};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// The signed-in customer.
pub struct UserSession {
    /// Account identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
}

/// Contact fields the customer can edit on the payment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    /// Full name.
    Name,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
}

impl CustomerInfo {
    /// Prefill contact fields from the session, leaving shipping fields empty.
    #[must_use]
    pub fn from_session(session: Option<&UserSession>) -> Self {
        let (name, email, phone) = session.map_or_else(Default::default, |user| {
            (user.name.clone(), user.email.clone(), user.phone.clone())
        });
        Self {
            name,
            email,
            phone,
            address: String::new(),
            city: String::new(),
            post_code: String::new(),
            country: String::new(),
        }
    }

    /// Overwrite the shipping fields from the trip.
    ///
    /// The address is the pickup text, the city comes from the resolved pickup area or
    /// falls back to the destination text, and postal code and country use the configured
    /// defaults.
    pub fn derive_shipping(
        &mut self,
        source: &str,
        destination: &str,
        pickup: Option<&ResolvedArea>,
        config: &WorkflowConfig,
    ) {
        self.address = source.trim().to_owned();
        self.city = pickup
            .map(|area| area.city.trim())
            .filter(|city| !city.is_empty())
            .unwrap_or_else(|| destination.trim())
            .to_owned();
        self.post_code.clone_from(&config.default_post_code);
        self.country.clone_from(&config.default_country);
    }

    /// Current value of a contact field.
    #[must_use]
    pub fn contact(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
        }
    }

    pub(crate) fn set_contact(&mut self, field: ContactField, value: String) {
        match field {
            ContactField::Name => self.name = value,
            ContactField::Email => self.email = value,
            ContactField::Phone => self.phone = value,
        }
    }

    /// Names of mandatory contact fields that are blank.
    #[must_use]
    pub fn missing_contacts(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AreaId;

    fn session() -> UserSession {
        UserSession {
            id: "u1".into(),
            name: "Rahim Uddin".into(),
            email: "rahim@example.com".into(),
            phone: "01711000000".into(),
        }
    }

    #[test]
    fn contacts_come_from_the_session() {
        let info = CustomerInfo::from_session(Some(&session()));
        assert_eq!(info.name, "Rahim Uddin");
        assert!(info.missing_contacts().is_empty());
    }

    #[test]
    fn anonymous_customer_is_missing_every_contact() {
        let info = CustomerInfo::from_session(None);
        assert_eq!(info.missing_contacts(), vec!["name", "email", "phone"]);
    }

    #[test]
    fn shipping_city_prefers_the_resolved_pickup_area() {
        let config = WorkflowConfig::default();
        let area = ResolvedArea {
            id: AreaId("g".into()),
            label: "Gulshan, Dhaka".into(),
            city: "Dhaka".into(),
            address: "Gulshan Avenue".into(),
            latitude: 23.79,
            longitude: 90.41,
        };
        let mut info = CustomerInfo::from_session(Some(&session()));
        info.derive_shipping("Gulshan, Dhaka", "Motijheel, Dhaka", Some(&area), &config);
        assert_eq!(info.address, "Gulshan, Dhaka");
        assert_eq!(info.city, "Dhaka");
        assert_eq!(info.post_code, config.default_post_code);

        info.derive_shipping("Somewhere", "Chattogram", None, &config);
        assert_eq!(info.city, "Chattogram");
        assert_eq!(info.country, "Bangladesh");
    }
}
