use fedhub_core::FedhubClient;

use crate::profile::Profile;

const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

pub struct Context {
    pub profile: Profile,
    pub client: FedhubClient,
}

impl Context {
    /// `FEDHUB_ENDPOINT` wins over the endpoint saved in the profile.
    pub fn load() -> anyhow::Result<Self> {
        let profile = Profile::load()?;

        let endpoint = dotenvy::var("FEDHUB_ENDPOINT")
            .ok()
            .or_else(|| profile.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());

        tracing::debug!("using endpoint {endpoint}");

        let client = FedhubClient::new(&endpoint)?;

        Ok(Self { profile, client })
    }
}
