use std::borrow::Cow;

use crate::config::AvatarConfig;

/// Rewrites avatar root names between participants.
///
/// Every participant names its own avatar `"My Avatar #<id>"` and everyone
/// else's `"Remote Avatar #<id>"`, so a path captured by the sender has to be
/// translated into the receiver's naming before it can be resolved.
#[derive(Debug, Clone)]
pub struct AvatarPathTranslator {
    local_avatar_id: Option<String>,
    mine_prefix: String,
    remote_prefix: String,
}

impl AvatarPathTranslator {
    pub fn new(local_avatar_id: Option<String>) -> Self {
        Self::with_config(local_avatar_id, &AvatarConfig::default())
    }

    pub fn with_config(local_avatar_id: Option<String>, config: &AvatarConfig) -> Self {
        Self {
            local_avatar_id,
            mine_prefix: config.mine_prefix.clone(),
            remote_prefix: config.remote_prefix.clone(),
        }
    }

    /// Find the local avatar id among the avatar root names
    pub fn from_avatar_names<'a, I>(names: I, config: &AvatarConfig) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let local_avatar_id = names
            .into_iter()
            .find_map(|name| name.strip_prefix(config.mine_prefix.as_str()))
            .map(str::to_string);
        Self::with_config(local_avatar_id, config)
    }

    pub fn local_avatar_id(&self) -> Option<&str> {
        self.local_avatar_id.as_deref()
    }

    pub fn set_local_avatar_id(&mut self, id: Option<String>) {
        self.local_avatar_id = id;
    }

    /// Local name for the avatar root with the given id
    pub fn avatar_root(&self, avatar_id: &str) -> String {
        if self.local_avatar_id.as_deref() == Some(avatar_id) {
            format!("{}{}", self.mine_prefix, avatar_id)
        } else {
            format!("{}{}", self.remote_prefix, avatar_id)
        }
    }

    pub fn translate<'p>(&self, path: &'p str) -> Cow<'p, str> {
        let local = self.local_avatar_id.as_deref();

        if let Some(id) = avatar_id_after(path, &self.mine_prefix) {
            if Some(id) != local {
                return Cow::Owned(swap_prefix(path, &self.mine_prefix, &self.remote_prefix, id));
            }
        } else if let Some(id) = avatar_id_after(path, &self.remote_prefix) {
            if Some(id) == local {
                return Cow::Owned(swap_prefix(path, &self.remote_prefix, &self.mine_prefix, id));
            }
        }

        Cow::Borrowed(path)
    }
}

/// Id following the first occurrence of `prefix`, up to the next '/'
fn avatar_id_after<'p>(path: &'p str, prefix: &str) -> Option<&'p str> {
    let start = path.find(prefix)? + prefix.len();
    let rest = &path[start..];
    Some(rest.split('/').next().unwrap_or(rest))
}

fn swap_prefix(path: &str, from: &str, to: &str, id: &str) -> String {
    path.replace(&format!("{}{}", from, id), &format!("{}{}", to, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_mine_becomes_remote() {
        let translator = AvatarPathTranslator::new(Some("b".into()));
        assert_eq!(
            translator.translate("Avatar Manager/My Avatar #a/Body"),
            "Avatar Manager/Remote Avatar #a/Body"
        );
    }

    #[test]
    fn test_own_remote_becomes_mine() {
        let translator = AvatarPathTranslator::new(Some("b".into()));
        assert_eq!(
            translator.translate("Avatar Manager/Remote Avatar #b/Body"),
            "Avatar Manager/My Avatar #b/Body"
        );
    }

    #[test]
    fn test_untouched_paths() {
        let translator = AvatarPathTranslator::new(Some("b".into()));
        assert!(matches!(translator.translate("Room/Whiteboard"), Cow::Borrowed(_)));
        assert!(matches!(
            translator.translate("Manager/My Avatar #b/Body"),
            Cow::Borrowed(_)
        ));
        assert!(matches!(
            translator.translate("Manager/Remote Avatar #c/Body"),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_id_at_end_of_path() {
        let translator = AvatarPathTranslator::new(Some("b".into()));
        assert_eq!(translator.translate("My Avatar #a"), "Remote Avatar #a");
    }

    #[test]
    fn test_round_trip_between_participants() {
        let x = AvatarPathTranslator::new(Some("a".into()));
        let y = AvatarPathTranslator::new(Some("b".into()));

        for original in ["Manager/My Avatar #a/Body", "Manager/Remote Avatar #b/Hat/Brim"] {
            let at_y = y.translate(original).into_owned();
            let back = x.translate(&at_y).into_owned();
            assert_ne!(at_y, original);
            assert_eq!(back, original);
        }
    }

    #[test]
    fn test_unknown_local_id_treats_every_mine_as_remote() {
        let translator = AvatarPathTranslator::new(None);
        assert_eq!(translator.translate("My Avatar #a/Body"), "Remote Avatar #a/Body");
        assert_eq!(translator.translate("Remote Avatar #a/Body"), "Remote Avatar #a/Body");
    }

    #[test]
    fn test_from_avatar_names() {
        let config = AvatarConfig::default();
        let names = ["Remote Avatar #x", "My Avatar #42", "Remote Avatar #y"];
        let translator = AvatarPathTranslator::from_avatar_names(names, &config);
        assert_eq!(translator.local_avatar_id(), Some("42"));
        assert_eq!(translator.avatar_root("42"), "My Avatar #42");
        assert_eq!(translator.avatar_root("x"), "Remote Avatar #x");
    }
}
