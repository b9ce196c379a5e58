use std::time::Duration;
use thiserror::Error;

/// A command was invoked again before its cooldown elapsed.
#[derive(Debug, Error)]
#[error("command is on cooldown for another {remaining:?}")]
pub struct CooldownActive {
    pub remaining: Duration,
}

/// The caller is on the deny-list.
#[derive(Debug, Error)]
#[error("user is blacklisted from using the bot")]
pub struct UserBlacklisted;

/// The caller invoked an owner-only command without being a bot owner.
#[derive(Debug, Error)]
#[error("user is not a bot owner")]
pub struct UserNotOwner;

/// The caller lacks platform permissions the command requires.
#[derive(Debug, Error)]
#[error("caller is missing permissions: {missing:?}")]
pub struct CallerMissingPermissions {
    pub missing: Vec<String>,
}

/// The bot account lacks platform permissions the command requires.
#[derive(Debug, Error)]
#[error("bot is missing permissions: {missing:?}")]
pub struct BotMissingPermissions {
    pub missing: Vec<String>,
}

/// A required positional argument was not supplied.
#[derive(Debug, Error)]
#[error("{description}")]
pub struct MissingRequiredArgument {
    pub description: String,
}

/// Classified command failure, consumed by the reply renderer and the logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDescriptor {
    CooldownActive { remaining: Duration },
    UserBlacklisted,
    UserNotOwner,
    CallerMissingPermissions { missing: Vec<String> },
    BotMissingPermissions { missing: Vec<String> },
    MissingRequiredArgument { description: String },
}

/// Classify a raw command failure into the closed taxonomy.
///
/// Predicates run in a fixed order and the first match wins. Anything that
/// matches none of them is handed back untouched so the caller can escalate
/// it; swallowing unrecognized errors would hide real bugs.
pub fn classify(err: anyhow::Error) -> Result<ErrorDescriptor, anyhow::Error> {
    if let Some(e) = err.downcast_ref::<CooldownActive>() {
        return Ok(ErrorDescriptor::CooldownActive {
            remaining: e.remaining,
        });
    }
    if err.downcast_ref::<UserBlacklisted>().is_some() {
        return Ok(ErrorDescriptor::UserBlacklisted);
    }
    if err.downcast_ref::<UserNotOwner>().is_some() {
        return Ok(ErrorDescriptor::UserNotOwner);
    }
    if let Some(e) = err.downcast_ref::<CallerMissingPermissions>() {
        return Ok(ErrorDescriptor::CallerMissingPermissions {
            missing: e.missing.clone(),
        });
    }
    if let Some(e) = err.downcast_ref::<BotMissingPermissions>() {
        return Ok(ErrorDescriptor::BotMissingPermissions {
            missing: e.missing.clone(),
        });
    }
    if let Some(e) = err.downcast_ref::<MissingRequiredArgument>() {
        return Ok(ErrorDescriptor::MissingRequiredArgument {
            description: e.description.clone(),
        });
    }
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn cooldown_classifies_with_remaining_time() {
        let err = anyhow::Error::new(CooldownActive {
            remaining: Duration::from_secs(52),
        });
        assert_eq!(
            classify(err).unwrap(),
            ErrorDescriptor::CooldownActive {
                remaining: Duration::from_secs(52)
            }
        );
    }

    #[test]
    fn blacklist_and_owner_classify() {
        assert_eq!(
            classify(anyhow::Error::new(UserBlacklisted)).unwrap(),
            ErrorDescriptor::UserBlacklisted
        );
        assert_eq!(
            classify(anyhow::Error::new(UserNotOwner)).unwrap(),
            ErrorDescriptor::UserNotOwner
        );
    }

    #[test]
    fn permission_kinds_carry_the_missing_names() {
        let err = anyhow::Error::new(CallerMissingPermissions {
            missing: vec!["manage_messages".into(), "ban_members".into()],
        });
        let ErrorDescriptor::CallerMissingPermissions { missing } = classify(err).unwrap() else {
            panic!("wrong kind");
        };
        assert_eq!(missing, vec!["manage_messages", "ban_members"]);

        let err = anyhow::Error::new(BotMissingPermissions {
            missing: vec!["kick_members".into()],
        });
        let ErrorDescriptor::BotMissingPermissions { missing } = classify(err).unwrap() else {
            panic!("wrong kind");
        };
        assert_eq!(missing, vec!["kick_members"]);
    }

    #[test]
    fn missing_argument_carries_the_description() {
        let err = anyhow::Error::new(MissingRequiredArgument {
            description: "user is a required argument that is missing.".into(),
        });
        assert_eq!(
            classify(err).unwrap(),
            ErrorDescriptor::MissingRequiredArgument {
                description: "user is a required argument that is missing.".into()
            }
        );
    }

    #[test]
    fn classification_sees_through_added_context() {
        let err =
            anyhow::Error::new(UserBlacklisted).context("while running the 'ping' command");
        assert_eq!(classify(err).unwrap(), ErrorDescriptor::UserBlacklisted);
    }

    #[test]
    fn unrecognized_errors_are_returned_untouched() {
        let err = anyhow!("some handler bug");
        let back = classify(err).unwrap_err();
        assert_eq!(back.to_string(), "some handler bug");

        let err = anyhow::Error::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "socket gone",
        ));
        let back = classify(err).unwrap_err();
        assert!(back.downcast_ref::<std::io::Error>().is_some());
    }
}
