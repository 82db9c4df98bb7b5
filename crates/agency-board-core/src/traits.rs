use crate::role::ActorRole;

/// Supplies the role of whoever is acting. Authentication happens elsewhere.
pub trait IdentityProvider {
    fn current_role(&self) -> ActorRole;
}

impl IdentityProvider for ActorRole {
    fn current_role(&self) -> ActorRole {
        *self
    }
}
