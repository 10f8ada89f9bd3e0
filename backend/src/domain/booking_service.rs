use shared::{BookingStatus, CancelTransition};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::CancelPolicy;
use crate::domain::booking_board::BookingBoard;
use crate::domain::commands::booking::{CancelBookingResult, CreateBookingCommand, CreateBookingResult};
use crate::domain::errors::DomainError;
use crate::domain::models::{NewBooking, ANONYMOUS_CUSTOMER};
use crate::identity::Session;
use crate::storage::traits::{BookingStorage, ProfileStorage};

const CANCEL_FAILED: &str = "Error cancelling booking. Please try again.";

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Booking submission and the caller's booking list
#[derive(Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingStorage>,
    profiles: Arc<dyn ProfileStorage>,
    cancel_policy: CancelPolicy,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingStorage>,
        profiles: Arc<dyn ProfileStorage>,
        cancel_policy: CancelPolicy,
    ) -> Self {
        Self {
            bookings,
            profiles,
            cancel_policy,
        }
    }

    /// Request a handyman.
    ///
    /// The caller is re-checked here rather than trusted from the screen.
    /// The handyman's availability flag is not consulted.
    pub async fn submit_booking(
        &self,
        session: Option<&Session>,
        command: CreateBookingCommand,
    ) -> Result<CreateBookingResult, DomainError> {
        let session = session.ok_or_else(|| {
            warn!("Booking rejected: no session");
            DomainError::Unauthenticated("Please log in to book a handyman".to_string())
        })?;
        info!(
            "Submitting booking for handyman {} by {}",
            command.handyman_id, session.identity.uid
        );

        let date_time = command
            .date_time
            .ok_or_else(|| DomainError::validation("Please select a date and time"))?;
        let description = present(command.description)
            .ok_or_else(|| DomainError::validation("Please provide a description of the work needed"))?;
        let address = present(command.address)
            .ok_or_else(|| DomainError::validation("Please provide your address"))?;

        let handyman = self
            .profiles
            .get_profile(&command.handyman_id)
            .await
            .map_err(|e| {
                error!("Error loading handyman {}: {:?}", command.handyman_id, e);
                DomainError::remote("Error creating booking. Please try again.", e)
            })?
            .ok_or_else(|| {
                warn!("Booking rejected: handyman {} not found", command.handyman_id);
                DomainError::NotFound("Handyman not found".to_string())
            })?;

        let new_booking = NewBooking {
            handyman_id: handyman.id.clone(),
            handyman_name: handyman.name.clone(),
            customer_id: session.identity.uid.clone(),
            customer_name: session
                .identity
                .display_name
                .clone()
                .unwrap_or_else(|| ANONYMOUS_CUSTOMER.to_string()),
            date_time,
            description,
            address,
            status: BookingStatus::Pending,
        };

        let booking = self.bookings.create_booking(&new_booking).await.map_err(|e| {
            error!("Error storing booking: {:?}", e);
            DomainError::remote("Error creating booking. Please try again.", e)
        })?;

        info!("Created booking {} with handyman {}", booking.id, booking.handyman_id);
        Ok(CreateBookingResult { booking })
    }

    /// Every booking whose customer is the caller, in store order
    pub async fn list_bookings(&self, session: &Session) -> Result<BookingBoard, DomainError> {
        info!("Listing bookings for {}", session.identity.uid);

        let bookings = self
            .bookings
            .list_bookings_for_customer(&session.identity.uid)
            .await
            .map_err(|e| {
                error!("Error fetching bookings: {:?}", e);
                DomainError::remote("Error loading bookings. Please try again later.", e)
            })?;

        info!("Found {} bookings for {}", bookings.len(), session.identity.uid);
        Ok(BookingBoard::new(bookings))
    }

    /// Move one of the caller's bookings to `cancelled`.
    ///
    /// The list is only updated after the store acknowledges the write. A
    /// failed write is reported as a `Failed` transition with the list unchanged.
    pub async fn cancel_booking(&self, session: &Session, booking_id: &str) -> Result<CancelBookingResult, DomainError> {
        info!("Cancelling booking {} for {}", booking_id, session.identity.uid);

        let mut board = self.list_bookings(session).await?;

        let entry = board.get(booking_id).ok_or_else(|| {
            warn!("Booking {} is not in the caller's list", booking_id);
            DomainError::NotFound("Booking not found".to_string())
        })?;

        if self.cancel_policy == CancelPolicy::PendingOnly && !entry.booking.is_pending() {
            warn!("Booking {} is {}, refusing to cancel", booking_id, entry.booking.status);
            return Err(DomainError::Conflict(
                "Only pending bookings can be cancelled".to_string(),
            ));
        }

        let pending = board
            .begin_cancel(booking_id)
            .ok_or_else(|| DomainError::Conflict("A change to this booking is already in progress".to_string()))?;

        let transition = match self
            .bookings
            .update_booking_status(booking_id, BookingStatus::Cancelled)
            .await
        {
            Ok(Some(stored)) => board.commit(pending, stored),
            Ok(None) => {
                error!("Booking {} disappeared before it could be cancelled", booking_id);
                board.fail(pending, CANCEL_FAILED)
            }
            Err(e) => {
                error!("Error cancelling booking {}: {:?}", booking_id, e);
                board.fail(pending, CANCEL_FAILED)
            }
        };

        if let CancelTransition::Committed { .. } = &transition {
            info!("Cancelled booking {}", booking_id);
        }
        Ok(CancelBookingResult { transition, board })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Booking, HandymanProfile};
    use crate::identity::Identity;
    use crate::storage::{BookingRepository, DbConnection, ProfileRepository};
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use shared::WriteState;

    fn session(uid: &str, display_name: Option<&str>) -> Session {
        Session {
            token: format!("token-{}", uid),
            identity: Identity {
                uid: uid.to_string(),
                email: None,
                phone: None,
                display_name: display_name.map(str::to_string),
            },
        }
    }

    fn handyman(id: &str, is_available: bool) -> HandymanProfile {
        HandymanProfile {
            id: id.to_string(),
            user_id: "pro".to_string(),
            email: None,
            name: Some("Alice".to_string()),
            experience: Some(4.0),
            hourly_rate: Some(35.0),
            bio: String::new(),
            location: String::new(),
            skills: Some(vec!["plumbing".to_string()]),
            availability: None,
            is_available,
            rating: 0.0,
            reviews: 0,
            created_at: None,
        }
    }

    fn when() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 11, 2, 9, 30, 0).unwrap()
    }

    fn command(handyman_id: &str) -> CreateBookingCommand {
        CreateBookingCommand {
            handyman_id: handyman_id.to_string(),
            date_time: Some(when()),
            description: Some("Leaking tap".to_string()),
            address: Some("1 Main St".to_string()),
        }
    }

    async fn setup_test(policy: CancelPolicy) -> (BookingService, BookingRepository) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let profiles = ProfileRepository::new(db.clone());
        profiles.store_profile(&handyman("h1", true)).await.unwrap();
        profiles.store_profile(&handyman("h2", false)).await.unwrap();
        let bookings = BookingRepository::new(db);
        let service = BookingService::new(Arc::new(bookings.clone()), Arc::new(profiles), policy);
        (service, bookings)
    }

    #[tokio::test]
    async fn test_submit_booking() {
        let (service, repo) = setup_test(CancelPolicy::Unguarded).await;
        let caller = session("c1", Some("Carl"));

        let result = service.submit_booking(Some(&caller), command("h1")).await.unwrap();
        let booking = result.booking;

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.handyman_name.as_deref(), Some("Alice"));
        assert_eq!(booking.customer_id, "c1");
        assert_eq!(booking.customer_name, "Carl");
        assert_eq!(booking.date_time, when());

        let stored = repo.list_bookings_for_customer("c1").await.unwrap();
        assert_eq!(stored, vec![booking]);
    }

    #[tokio::test]
    async fn test_submit_ignores_availability_flag() {
        let (service, _) = setup_test(CancelPolicy::Unguarded).await;

        let result = service
            .submit_booking(Some(&session("c1", None)), command("h2"))
            .await
            .unwrap();

        assert_eq!(result.booking.status, BookingStatus::Pending);
        assert_eq!(result.booking.customer_name, ANONYMOUS_CUSTOMER);
    }

    #[tokio::test]
    async fn test_submit_rejections_write_nothing() {
        let (service, repo) = setup_test(CancelPolicy::Unguarded).await;
        let caller = session("c1", None);

        let unauthenticated = service.submit_booking(None, command("h1")).await;
        assert!(matches!(unauthenticated, Err(DomainError::Unauthenticated(_))));

        let cases = vec![
            (CreateBookingCommand { date_time: None, ..command("h1") }, "Please select a date and time"),
            (
                CreateBookingCommand { description: None, ..command("h1") },
                "Please provide a description of the work needed",
            ),
            (
                CreateBookingCommand { description: Some("  ".to_string()), ..command("h1") },
                "Please provide a description of the work needed",
            ),
            (CreateBookingCommand { address: None, ..command("h1") }, "Please provide your address"),
        ];
        for (cmd, expected) in cases {
            let result = service.submit_booking(Some(&caller), cmd).await;
            assert!(
                matches!(result, Err(DomainError::Validation(ref m)) if m == expected),
                "expected {:?}",
                expected
            );
        }

        let unknown = service.submit_booking(Some(&caller), command("nobody")).await;
        assert!(matches!(unknown, Err(DomainError::NotFound(_))));

        assert!(repo.list_bookings_for_customer("c1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_bookings_only_callers() {
        let (service, _) = setup_test(CancelPolicy::Unguarded).await;
        service.submit_booking(Some(&session("c1", None)), command("h1")).await.unwrap();
        service.submit_booking(Some(&session("c2", None)), command("h1")).await.unwrap();

        let board = service.list_bookings(&session("c1", None)).await.unwrap();
        assert_eq!(board.entries().len(), 1);
        assert_eq!(board.entries()[0].booking.customer_id, "c1");
        assert!(board.entries()[0].can_cancel());
    }

    #[tokio::test]
    async fn test_cancel_pending_booking() {
        let (service, repo) = setup_test(CancelPolicy::Unguarded).await;
        let caller = session("c1", None);
        let booking = service.submit_booking(Some(&caller), command("h1")).await.unwrap().booking;

        let result = service.cancel_booking(&caller, &booking.id).await.unwrap();

        assert_eq!(
            result.transition,
            CancelTransition::Committed {
                booking_id: booking.id.clone()
            }
        );
        let entry = result.board.get(&booking.id).unwrap();
        assert_eq!(entry.booking.status, BookingStatus::Cancelled);
        assert_eq!(entry.write_state, WriteState::Committed);

        let stored = repo.get_booking(&booking.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_double_cancel_follows_policy() {
        let caller = session("c1", None);

        let (unguarded, _) = setup_test(CancelPolicy::Unguarded).await;
        let booking = unguarded.submit_booking(Some(&caller), command("h1")).await.unwrap().booking;
        unguarded.cancel_booking(&caller, &booking.id).await.unwrap();
        let again = unguarded.cancel_booking(&caller, &booking.id).await.unwrap();
        assert!(matches!(again.transition, CancelTransition::Committed { .. }));

        let (guarded, _) = setup_test(CancelPolicy::PendingOnly).await;
        let booking = guarded.submit_booking(Some(&caller), command("h1")).await.unwrap().booking;
        guarded.cancel_booking(&caller, &booking.id).await.unwrap();
        let again = guarded.cancel_booking(&caller, &booking.id).await;
        assert!(matches!(again, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_cancel_other_customers_booking() {
        let (service, repo) = setup_test(CancelPolicy::Unguarded).await;
        let booking = service
            .submit_booking(Some(&session("c1", None)), command("h1"))
            .await
            .unwrap()
            .booking;

        let result = service.cancel_booking(&session("c2", None), &booking.id).await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
        let stored = repo.get_booking(&booking.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Pending);
    }

    /// Reads succeed from a fixed list; status updates always fail
    struct ReadOnlyBookings {
        bookings: Vec<Booking>,
    }

    #[async_trait]
    impl BookingStorage for ReadOnlyBookings {
        async fn create_booking(&self, _booking: &NewBooking) -> Result<Booking> {
            Err(anyhow::anyhow!("store is read-only"))
        }
        async fn get_booking(&self, booking_id: &str) -> Result<Option<Booking>> {
            Ok(self.bookings.iter().find(|b| b.id == booking_id).cloned())
        }
        async fn list_bookings_for_customer(&self, customer_id: &str) -> Result<Vec<Booking>> {
            Ok(self.bookings.iter().filter(|b| b.customer_id == customer_id).cloned().collect())
        }
        async fn update_booking_status(&self, _booking_id: &str, _status: BookingStatus) -> Result<Option<Booking>> {
            Err(anyhow::anyhow!("permission denied"))
        }
    }

    #[tokio::test]
    async fn test_failed_cancel_leaves_list_unchanged() {
        let booking = Booking {
            id: "b1".to_string(),
            handyman_id: "h1".to_string(),
            handyman_name: Some("Alice".to_string()),
            customer_id: "c1".to_string(),
            customer_name: ANONYMOUS_CUSTOMER.to_string(),
            date_time: when(),
            description: "Leaking tap".to_string(),
            address: "1 Main St".to_string(),
            status: BookingStatus::Pending,
            created_at: when(),
        };
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let service = BookingService::new(
            Arc::new(ReadOnlyBookings {
                bookings: vec![booking.clone()],
            }),
            Arc::new(ProfileRepository::new(db)),
            CancelPolicy::Unguarded,
        );
        let caller = session("c1", None);

        let result = service.cancel_booking(&caller, "b1").await.unwrap();

        assert_eq!(
            result.transition,
            CancelTransition::Failed {
                booking_id: "b1".to_string(),
                message: CANCEL_FAILED.to_string(),
            }
        );
        let entry = result.board.get("b1").unwrap();
        assert_eq!(entry.booking, booking);
        assert_eq!(entry.write_state, WriteState::Failed);

        let submit = service.submit_booking(Some(&caller), command("h1")).await;
        assert!(matches!(submit, Err(DomainError::NotFound(_))));
    }
}
