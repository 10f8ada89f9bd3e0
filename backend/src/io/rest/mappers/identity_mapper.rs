use crate::identity::{Identity, Session};
use shared::{AuthResponse, IdentityInfo, Route, SessionResponse};

pub struct IdentityMapper;

impl IdentityMapper {
    pub fn to_dto(identity: Identity) -> IdentityInfo {
        IdentityInfo {
            uid: identity.uid,
            email: identity.email,
            phone: identity.phone,
            display_name: identity.display_name,
        }
    }

    pub fn to_auth_response(session: Session, redirect_to: Route) -> AuthResponse {
        AuthResponse {
            token: session.token,
            identity: Self::to_dto(session.identity),
            redirect_to: redirect_to.path(),
        }
    }

    pub fn to_session_response(session: Option<Session>) -> SessionResponse {
        SessionResponse {
            identity: session.map(|s| Self::to_dto(s.identity)),
        }
    }
}
