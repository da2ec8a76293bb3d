use strum::{AsRefStr, EnumIter, EnumString};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter, EnumString)]
pub enum Role {
    Admin,
    #[default]
    User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trips_through_name() {
        let role = Role::from_str("Admin").unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(role.as_ref(), "Admin");

        let role = Role::from_str("User").unwrap();
        assert_eq!(role, Role::User);

        assert!(Role::from_str("guest").is_err());
    }
}
