/// Router Module Index
///
/// Splits the routing table by access level. Public routes carry no gate; every admin
/// route runs its guarded loader before returning any data.

/// Routes accessible to all clients (health probe).
pub mod public;

/// Admin page loaders, each gated on administrator privilege.
pub mod admin;
