use std::{env, fs, path::PathBuf};

use anyhow::{Context, Result, bail};
use truckhaul_core::{
    config::WorkflowConfig,
    model::{DriverId, TruckType},
    orchestrator::TripContext,
    session::UserSession,
};

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_LOG_FILE: &str = "truckhaul.log";

/// Everything the client reads from the environment at startup.
pub(crate) struct Settings {
    pub api_url: String,
    pub token: Option<String>,
    pub session: Option<UserSession>,
    pub trip: TripContext,
    pub workflow: WorkflowConfig,
    pub log_file: PathBuf,
}

impl Settings {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let workflow = match var("TRUCKHAUL_CONFIG") {
            Some(path) => {
                let raw = fs::read_to_string(&path)
                    .with_context(|| format!("reading workflow config {path}"))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing workflow config {path}"))?
            }
            None => WorkflowConfig::default(),
        };

        let Some(driver_id) = var("TRUCKHAUL_DRIVER_ID") else {
            bail!("TRUCKHAUL_DRIVER_ID must name the driver to book");
        };
        let truck_type = match var("TRUCKHAUL_TRUCK_TYPE") {
            Some(slug) => TruckType::from_slug(&slug)
                .with_context(|| format!("unknown truck type {slug}"))?,
            None => TruckType::Pickup,
        };

        let token = var("TRUCKHAUL_TOKEN");
        // A session without a token would only fail later with a 401
        let session = token.as_ref().and_then(|_| {
            Some(UserSession {
                id: var("TRUCKHAUL_USER_ID")?,
                name: var("TRUCKHAUL_USER_NAME").unwrap_or_default(),
                email: var("TRUCKHAUL_USER_EMAIL").unwrap_or_default(),
                phone: var("TRUCKHAUL_USER_PHONE").unwrap_or_default(),
            })
        });

        Ok(Self {
            api_url: var("TRUCKHAUL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
            token,
            session,
            trip: TripContext {
                driver_id: DriverId(driver_id),
                truck_type,
            },
            workflow,
            log_file: var("TRUCKHAUL_LOG").map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn driver_is_required() {
        assert!(settings(&[]).is_err());
    }

    #[test]
    fn defaults_apply_without_a_session() {
        let loaded = settings(&[("TRUCKHAUL_DRIVER_ID", "drv-7")]).expect("settings");
        assert_eq!(loaded.api_url, DEFAULT_API_URL);
        assert_eq!(loaded.trip.truck_type, TruckType::Pickup);
        assert!(loaded.session.is_none());
        assert_eq!(loaded.workflow, WorkflowConfig::default());
    }

    #[test]
    fn token_and_user_make_a_session() {
        let loaded = settings(&[
            ("TRUCKHAUL_DRIVER_ID", "drv-7"),
            ("TRUCKHAUL_TRUCK_TYPE", "covered_van"),
            ("TRUCKHAUL_TOKEN", "t0k"),
            ("TRUCKHAUL_USER_ID", "cust-1"),
            ("TRUCKHAUL_USER_NAME", "Rahim Uddin"),
        ])
        .expect("settings");
        assert_eq!(loaded.trip.truck_type, TruckType::CoveredVan);
        let session = loaded.session.expect("session");
        assert_eq!(session.name, "Rahim Uddin");
        assert!(session.email.is_empty());
    }

    #[test]
    fn unknown_truck_type_is_rejected() {
        assert!(
            settings(&[
                ("TRUCKHAUL_DRIVER_ID", "drv-7"),
                ("TRUCKHAUL_TRUCK_TYPE", "boat")
            ])
            .is_err()
        );
    }
}
