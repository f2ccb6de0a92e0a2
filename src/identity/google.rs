//! Google sign-in using the OAuth 2.0 device authorization grant.
//!
//! ```text
//! POST /device/code ──► user_code + verification_url ──► shown to the user
//!        │
//!        ▼
//! POST /token (every `interval` s) ── authorization_pending ─┐
//!        │                          ── slow_down (+5 s) ─────┤
//!        │ access_token                                      │
//!        ▼                            ◄──────────────────────┘
//! GET userinfo ──► UserProfile
//! ```

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;
use tokio::sync::mpsc::Sender;

use super::{IdentityError, IdentityProvider, SignInPrompt, UserProfile};

pub const DEFAULT_OAUTH_BASE_URL: &str = "https://oauth2.googleapis.com";
pub const DEFAULT_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

const SCOPES: &str = "openid email profile";
const DEVICE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";
const SLOW_DOWN_STEP: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub oauth_base: String,
    pub userinfo_url: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            oauth_base: DEFAULT_OAUTH_BASE_URL.to_string(),
            userinfo_url: DEFAULT_USERINFO_URL.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct DeviceCodeResponse {
    device_code: String,
    user_code: String,
    #[serde(alias = "verification_uri")]
    verification_url: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
    #[serde(default = "default_interval")]
    interval: u64,
}

fn default_expires_in() -> u64 {
    1800
}

fn default_interval() -> u64 {
    5
}

#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize, Debug)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

pub struct GoogleDeviceIdentity {
    client_id: String,
    client_secret: Option<String>,
    endpoints: GoogleEndpoints,
    client: reqwest::Client,
    access_token: Mutex<Option<String>>,
}

impl GoogleDeviceIdentity {
    pub fn new(
        client_id: String,
        client_secret: Option<String>,
        endpoints: GoogleEndpoints,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            endpoints: GoogleEndpoints {
                oauth_base: endpoints.oauth_base.trim_end_matches('/').to_string(),
                userinfo_url: endpoints.userinfo_url,
            },
            client: reqwest::Client::new(),
            access_token: Mutex::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.endpoints.oauth_base)
    }

    async fn request_device_code(&self) -> Result<DeviceCodeResponse, IdentityError> {
        let response = self
            .client
            .post(self.url("device/code"))
            .form(&[("client_id", self.client_id.as_str()), ("scope", SCOPES)])
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;
        if !status.is_success() {
            warn!("Device code request failed: {} - {}", status, body);
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        serde_json::from_str(&body).map_err(|e| IdentityError::Parse(e.to_string()))
    }

    async fn poll_for_token(&self, device: &DeviceCodeResponse) -> Result<String, IdentityError> {
        let deadline = Instant::now() + Duration::from_secs(device.expires_in);
        let mut interval = Duration::from_secs(device.interval);

        let mut form = vec![
            ("client_id", self.client_id.as_str()),
            ("device_code", device.device_code.as_str()),
            ("grant_type", DEVICE_GRANT_TYPE),
        ];
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret.as_str()));
        }

        loop {
            tokio::time::sleep(interval).await;
            if Instant::now() > deadline {
                return Err(IdentityError::Expired);
            }

            let response = self
                .client
                .post(self.url("token"))
                .form(&form)
                .send()
                .await
                .map_err(|e| IdentityError::Network(e.to_string()))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| IdentityError::Network(e.to_string()))?;

            if status.is_success() {
                let token: TokenResponse =
                    serde_json::from_str(&body).map_err(|e| IdentityError::Parse(e.to_string()))?;
                return Ok(token.access_token);
            }

            let Ok(err) = serde_json::from_str::<OAuthErrorBody>(&body) else {
                return Err(IdentityError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            };
            match err.error.as_str() {
                "authorization_pending" => debug!("Device authorization pending"),
                "slow_down" => {
                    interval += SLOW_DOWN_STEP;
                    debug!("Polling slowed to {:?}", interval);
                }
                "access_denied" => {
                    return Err(IdentityError::Denied(
                        err.error_description.unwrap_or(err.error),
                    ));
                }
                "expired_token" => return Err(IdentityError::Expired),
                _ => {
                    return Err(IdentityError::Api {
                        status: status.as_u16(),
                        message: body,
                    });
                }
            }
        }
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, IdentityError> {
        let response = self
            .client
            .get(&self.endpoints.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api { status, message });
        }

        let mut profile: UserProfile = response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))?;
        if profile.display_name.trim().is_empty() {
            profile.display_name = profile.email.clone().unwrap_or_else(|| "Pengguna".to_string());
        }
        Ok(profile)
    }
}

#[async_trait]
impl IdentityProvider for GoogleDeviceIdentity {
    fn name(&self) -> &str {
        "google"
    }

    async fn sign_in(&self, prompts: Sender<SignInPrompt>) -> Result<UserProfile, IdentityError> {
        let device = self.request_device_code().await?;
        info!(
            "Device code issued: verification_url={}, interval={}s, expires_in={}s",
            device.verification_url, device.interval, device.expires_in
        );

        let prompt = SignInPrompt {
            verification_url: device.verification_url.clone(),
            user_code: device.user_code.clone(),
        };
        if prompts.send(prompt).await.is_err() {
            warn!("Sign-in prompt dropped: receiver closed");
        }

        let token = self.poll_for_token(&device).await?;
        let profile = self.fetch_profile(&token).await?;
        if let Ok(mut slot) = self.access_token.lock() {
            *slot = Some(token);
        }
        info!("Signed in as {}", profile.display_name);
        Ok(profile)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        let token = self.access_token.lock().ok().and_then(|mut slot| slot.take());
        let Some(token) = token else {
            debug!("Sign-out without a token, nothing to revoke");
            return Ok(());
        };

        let response = self
            .client
            .post(self.url("revoke"))
            .form(&[("token", token.as_str())])
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!("Token revoke failed: {} - {}", status, message);
            return Err(IdentityError::Api { status, message });
        }
        info!("Signed out, token revoked");
        Ok(())
    }
}
