//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum that maps to HTTP status codes and to the
//! default machine-readable error code sent to clients.

use serde::Serialize;

/// エラー種別
///
/// 各バリアントは HTTP ステータスコードと、JSON エラーボディの `error`
/// フィールドに入るデフォルトの `ERR_*` コードにそれぞれ一対一で対応します。
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::NotFound;
/// assert_eq!(kind.status_code(), 404);
/// assert_eq!(kind.default_code(), "ERR_NOT_FOUND");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    // ========================================================================
    // 4xx Client Errors
    // ========================================================================
    /// 400 - リクエストを解釈できない（パラメータ不足・形式不正）
    BadRequest,
    /// 403 - アクセス拒否（署名不一致など）
    Forbidden,
    /// 404 - リソース（またはセッション）が存在しない
    NotFound,
    /// 415 - 対応していない Content-Type
    UnsupportedMediaType,
    /// 422 - 形式は正しいがデータを処理できない（特異行列など）
    UnprocessableEntity,

    // ========================================================================
    // 5xx Server Errors
    // ========================================================================
    /// 500 - 呼び出し側では解決できない内部エラー
    InternalServerError,
}

impl ErrorKind {
    /// HTTP ステータスコードを取得
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::UnsupportedMediaType => 415,
            ErrorKind::UnprocessableEntity => 422,
            ErrorKind::InternalServerError => 500,
        }
    }

    /// 標準の理由フレーズを取得
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::UnsupportedMediaType => "Unsupported Media Type",
            ErrorKind::UnprocessableEntity => "Unprocessable Entity",
            ErrorKind::InternalServerError => "Internal Server Error",
        }
    }

    /// [`AppError`](super::app_error::AppError) に個別のコードがない場合に
    /// 使われるデフォルトのエラーコード
    #[inline]
    pub const fn default_code(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "ERR_BAD_REQUEST",
            ErrorKind::Forbidden => "ERR_FORBIDDEN",
            ErrorKind::NotFound => "ERR_NOT_FOUND",
            ErrorKind::UnsupportedMediaType => "ERR_UNSUPPORTED_MEDIA_TYPE",
            ErrorKind::UnprocessableEntity => "ERR_INVALID_DATA",
            ErrorKind::InternalServerError => "ERR_SERVER_ERROR",
        }
    }

    /// サーバーエラー（5xx）かどうか
    ///
    /// サーバーエラーはログに記録すべきです。
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// クライアントエラー（4xx）かどうか
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
