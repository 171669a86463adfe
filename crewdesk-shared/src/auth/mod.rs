/// Authentication primitives
///
/// - `jwt`: bearer-token creation and validation (HS256)
/// - `password`: Argon2id hashing and verification
///
/// Identity resolution (token → current user) lives in the API crate's
/// middleware, since it needs the injected store.

pub mod jwt;
pub mod password;
