use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    pub media_upload_url: String,
    pub media_upload_preset: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            media_upload_url: env::var("MEDIA_UPLOAD_URL")
                .unwrap_or_else(|_| {
                    warn!("MEDIA_UPLOAD_URL not set, using empty value");
                    String::new()
                }),
            media_upload_preset: env::var("MEDIA_UPLOAD_PRESET")
                .unwrap_or_else(|_| {
                    warn!("MEDIA_UPLOAD_PRESET not set, using default");
                    "agropetvet".to_string()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }

    pub fn is_media_configured(&self) -> bool {
        !self.media_upload_url.is_empty() && !self.media_upload_preset.is_empty()
    }
}
