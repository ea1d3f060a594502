//! Command dispatch and handlers.

pub mod parse;
pub mod session;

pub use parse::Command;

use crate::core::error::Result;
use crate::core::output::{Reply, TxAction};
use crate::core::store::KvStore;

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue(Option<Reply>),
    Exit,
}

pub fn execute(store: &mut KvStore, command: Command) -> Result<Outcome> {
    tracing::debug!(command = command.name(), "executing");

    let reply = match command {
        Command::Set { key, value } => {
            store.set(&key, &value);
            None
        }
        Command::Get { key } => Some(Reply::Value {
            value: store.get(&key).map(str::to_string),
        }),
        Command::Unset { key } => {
            store.unset(&key);
            None
        }
        Command::Counts { value } => Some(Reply::Count {
            count: store.counts(&value),
        }),
        Command::Find { value } => Some(Reply::Keys {
            keys: store.find(&value),
        }),
        Command::Begin => {
            store.begin();
            None
        }
        Command::Rollback => Some(transaction_reply(TxAction::Rollback, store)?),
        Command::Commit => Some(transaction_reply(TxAction::Commit, store)?),
        Command::End => return Ok(Outcome::Exit),
    };

    Ok(Outcome::Continue(reply))
}

fn transaction_reply(action: TxAction, store: &mut KvStore) -> Result<Reply> {
    let changes = match action {
        TxAction::Commit => store.commit()?,
        TxAction::Rollback => store.rollback()?,
    };
    tracing::debug!(%action, changes = changes.len(), "transaction closed");
    Ok(Reply::Transaction { action, changes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorCode;

    fn run(store: &mut KvStore, line: &str) -> Outcome {
        let command = Command::parse(line).unwrap().unwrap();
        execute(store, command).unwrap()
    }

    #[test]
    fn mutations_produce_no_reply() {
        let mut store = KvStore::new();
        assert_eq!(run(&mut store, "SET a 10"), Outcome::Continue(None));
        assert_eq!(run(&mut store, "UNSET a"), Outcome::Continue(None));
        assert_eq!(run(&mut store, "BEGIN"), Outcome::Continue(None));
    }

    #[test]
    fn queries_reply_with_store_state() {
        let mut store = KvStore::new();
        run(&mut store, "SET a 10");
        run(&mut store, "SET b 10");

        assert_eq!(
            run(&mut store, "GET a"),
            Outcome::Continue(Some(Reply::Value {
                value: Some("10".into())
            }))
        );
        assert_eq!(
            run(&mut store, "GET missing"),
            Outcome::Continue(Some(Reply::Value { value: None }))
        );
        assert_eq!(
            run(&mut store, "COUNTS 10"),
            Outcome::Continue(Some(Reply::Count { count: 2 }))
        );
        assert_eq!(
            run(&mut store, "FIND 10"),
            Outcome::Continue(Some(Reply::Keys {
                keys: vec!["a".into(), "b".into()]
            }))
        );
    }

    #[test]
    fn rollback_replies_with_journal() {
        let mut store = KvStore::new();
        run(&mut store, "BEGIN");
        run(&mut store, "SET a foo");

        match run(&mut store, "ROLLBACK") {
            Outcome::Continue(Some(Reply::Transaction { action, changes })) => {
                assert_eq!(action, TxAction::Rollback);
                assert_eq!(changes.entries(), ["BEGIN", "SET a foo"]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn commit_without_transaction_is_recoverable() {
        let mut store = KvStore::new();
        let err = execute(&mut store, Command::Commit).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NoTransaction);
        assert!(err.is_recoverable());
    }

    #[test]
    fn end_exits() {
        let mut store = KvStore::new();
        assert_eq!(run(&mut store, "END"), Outcome::Exit);
    }
}
