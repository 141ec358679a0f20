/// The single source of truth for manage-type authorization. Every
/// ownership comparison in the handlers routes through here.

pub const SUPER_ADMIN_ID: &str = "1";

pub fn is_super_admin(subject_id: &str) -> bool {
    subject_id == SUPER_ADMIN_ID
}

/// True iff the subject may manage a resource owned by `owner_id`.
pub fn can_manage(subject_id: &str, owner_id: &str) -> bool {
    is_super_admin(subject_id) || subject_id == owner_id
}

pub fn is_manager(subject_id: &str, managers: &[String]) -> bool {
    is_super_admin(subject_id) || managers.iter().any(|m| m == subject_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_can_manage_own_resource() {
        assert!(can_manage("42", "42"));
    }

    #[test]
    fn stranger_cannot_manage() {
        assert!(!can_manage("42", "7"));
    }

    #[test]
    fn super_admin_bypasses_ownership() {
        assert!(can_manage("1", "7"));
        assert!(is_super_admin("1"));
        assert!(!is_super_admin("10"));
    }

    #[test]
    fn manager_membership() {
        let managers = vec!["42".to_string(), "7".to_string()];
        assert!(is_manager("42", &managers));
        assert!(!is_manager("8", &managers));
        // super admin is always a manager
        assert!(is_manager("1", &[]));
    }
}
