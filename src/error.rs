use thiserror::Error;

/// Shown for every transport or decode failure.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Tidak dapat terhubung ke server. Periksa koneksi internet Anda.";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Classifies a non-2xx response.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => ClientError::Unauthorized(message),
            422 => ClientError::Validation(message),
            _ => ClientError::Http { status, message },
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Validation(_) => Some(422),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            ClientError::Decode(_) | ClientError::Config(_) => None,
        }
    }

    /// Indonesian message safe to show to the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) | ClientError::Decode(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ClientError::Http { message, .. }
            | ClientError::Unauthorized(message)
            | ClientError::Validation(message)
            | ClientError::Config(message) => message.clone(),
        }
    }
}

/// Generic message for a failed status when the server sent none.
pub fn fallback_message(status: u16) -> &'static str {
    match status {
        400 => "Permintaan tidak valid",
        401 => "Sesi Anda telah berakhir. Silakan masuk kembali.",
        403 => "Anda tidak memiliki akses untuk melakukan tindakan ini",
        404 => "Data tidak ditemukan",
        409 => "Data sudah ada",
        422 => "Data yang dikirim tidak valid",
        429 => "Terlalu banyak permintaan. Coba lagi nanti.",
        400..=499 => "Permintaan gagal diproses",
        500..=599 => "Terjadi kesalahan pada server. Coba lagi nanti.",
        _ => "Terjadi kesalahan yang tidak terduga",
    }
}
