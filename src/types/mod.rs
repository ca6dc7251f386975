mod user;

pub use user::User;

#[cfg(test)]
pub use user::Company;
