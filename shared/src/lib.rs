use serde::{Deserialize, Serialize};
use std::fmt;

/// Named screens of the marketplace front-end.
///
/// Responses that end a flow carry `redirect_to` with one of these paths so the
/// client knows where to go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    SignUp,
    HandymanSignUp,
    Handymen,
    Dashboard,
    HandymanDetails(String),
    HandymanProfile,
    Bookings,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::SignUp => "/signup".to_string(),
            Route::HandymanSignUp => "/handyman-signup".to_string(),
            Route::Handymen => "/handymen".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::HandymanDetails(id) => format!("/handyman/{}", id),
            Route::HandymanProfile => "/handyman-profile".to_string(),
            Route::Bookings => "/bookings".to_string(),
        }
    }

    /// Screens that sit behind the identity gate
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::HandymanProfile | Route::Bookings)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Day names used in a handyman's weekly availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

/// Weekly availability of a handyman
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    #[serde(default)]
    pub days: Vec<Weekday>,
    /// Start time of day (HH:MM)
    pub start_time: Option<String>,
    /// End time of day (HH:MM)
    pub end_time: Option<String>,
}

/// Public listing of a service professional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandymanProfile {
    pub id: String,
    /// Identity that created the profile
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    /// Years of experience
    pub experience: Option<f64>,
    pub hourly_rate: Option<f64>,
    pub bio: String,
    pub location: String,
    pub skills: Option<Vec<String>>,
    pub availability: Availability,
    pub is_available: bool,
    pub rating: f64,
    pub reviews: u32,
    /// RFC 3339 timestamp
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandymanListResponse {
    pub handymen: Vec<HandymanProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandymanDetailsResponse {
    pub handyman: HandymanProfile,
    /// False when the handyman is not currently taking bookings
    pub bookable: bool,
    pub availability_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryListResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateHandymanProfileRequest {
    pub name: Option<String>,
    pub experience: Option<f64>,
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub is_available: Option<bool>,
    pub availability: Option<Availability>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateHandymanProfileResponse {
    pub handyman: HandymanProfile,
    pub redirect_to: String,
    pub success_message: String,
}

/// Lifecycle of a booking as implemented: created pending, optionally cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub handyman_id: String,
    /// Copy of the handyman's name taken when the booking was made
    pub handyman_name: Option<String>,
    pub customer_id: String,
    /// Copy of the customer's name taken when the booking was made
    pub customer_name: String,
    /// Requested date and time (RFC 3339)
    pub date_time: String,
    pub description: String,
    pub address: String,
    pub status: BookingStatus,
    /// Store-assigned creation time (RFC 3339)
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    /// Requested date and time (RFC 3339)
    pub date_time: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookingResponse {
    pub booking: Booking,
    pub redirect_to: String,
}

/// Progress of the last write issued against a booking in the caller's list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteState {
    Idle,
    PendingWrite,
    Committed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingEntry {
    pub booking: Booking,
    /// Whether the cancel action is offered for this booking
    pub can_cancel: bool,
    pub write_state: WriteState,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingListResponse {
    pub bookings: Vec<BookingEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CancelTransition {
    Committed { booking_id: String },
    Failed { booking_id: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelBookingResponse {
    pub transition: CancelTransition,
    pub bookings: Vec<BookingEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityInfo {
    pub uid: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    pub phone: String,
}

/// Returned whenever a sign-in completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub identity: IdentityInfo,
    pub redirect_to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneChallengeRequest {
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneChallengeResponse {
    pub challenge_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub challenge_id: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub identity: Option<IdentityInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignOutResponse {
    pub success_message: String,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub redirect_to: Option<String>,
}
