pub mod auth;
pub mod billing;
pub mod config;
pub mod goal;
pub mod rewards;
pub mod step;

use std::error::Error;
use std::future::Future;

use momentum_core::storage::open_credential_store;
use momentum_core::{ClientError, Config, Gateway, PlanLimits, SessionManager};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn Error>>;

/// What every API-backed command needs.
pub struct Context {
    pub config: Config,
    pub session: SessionManager,
    pub json: bool,
}

impl Context {
    pub fn new(api_url: Option<String>, json: bool) -> Result<Self, Box<dyn Error>> {
        let config = Config::load()?;
        let credentials = open_credential_store(&config)?;

        let gateway = Gateway::from_config(&config, api_url.as_deref(), credentials)?;
        let session = SessionManager::with_ttl(gateway, config.token_ttl()?);

        Ok(Self {
            config,
            session,
            json,
        })
    }

    pub fn gateway(&self) -> &Gateway {
        self.session.gateway()
    }

    pub fn limits(&self) -> PlanLimits {
        PlanLimits::new(self.config.limits.free_goal_limit)
    }

    /// Fail early, without a request, when nobody is signed in.
    pub fn require_login(&self) -> CmdResult {
        match self.gateway().credentials().load() {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err("not signed in (run `momentum auth login`)".into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Run a signed-in call; a rejected session is reported as such.
    pub async fn call<T, F, Fut>(&self, call: F) -> Result<T, Box<dyn Error>>
    where
        F: FnOnce(Gateway) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        self.require_login()?;
        self.session.authorized(call).await.map_err(|e| -> Box<dyn Error> {
            if e.is_session_rejected() {
                format!("{} (session expired, run `momentum auth login`)", e.user_message()).into()
            } else {
                e.user_message().into()
            }
        })
    }

    /// JSON when `--json` is set, otherwise the human rendering.
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> CmdResult {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }
}
