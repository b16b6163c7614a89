use anyhow::Result;

use crate::Database;

fn token_key(user_id: &str) -> String {
    format!("{}:github-token", user_id)
}

impl Database {
    // -- Per-user GitHub tokens --

    pub fn save_token(&self, user_id: &str, token: &str) -> Result<()> {
        self.kv_set(&token_key(user_id), token.as_bytes())
    }

    pub fn get_token(&self, user_id: &str) -> Result<Option<String>> {
        let blob = self.kv_get(&token_key(user_id))?;
        Ok(blob.map(|b| String::from_utf8_lossy(&b).into_owned()))
    }

    /// Deleting a token that was never stored is a no-op.
    pub fn delete_token(&self, user_id: &str) -> Result<()> {
        self.kv_delete(&token_key(user_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    #[test]
    fn register_overwrites_previous_token() {
        let db = Database::open_in_memory().unwrap();

        assert_eq!(db.get_token("U1").unwrap(), None);

        db.save_token("U1", "ghp_first").unwrap();
        db.save_token("U1", "ghp_second").unwrap();
        assert_eq!(db.get_token("U1").unwrap().as_deref(), Some("ghp_second"));

        // Tokens are per user
        assert_eq!(db.get_token("U2").unwrap(), None);
    }

    #[test]
    fn deregister_without_register_is_a_noop() {
        let db = Database::open_in_memory().unwrap();
        db.delete_token("U1").unwrap();
        assert_eq!(db.get_token("U1").unwrap(), None);
    }

    #[test]
    fn deregister_removes_the_token() {
        let db = Database::open_in_memory().unwrap();
        db.save_token("U1", "ghp_tok").unwrap();
        db.delete_token("U1").unwrap();
        assert_eq!(db.get_token("U1").unwrap(), None);
    }
}
