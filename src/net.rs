//! Background network worker.
//!
//! The UI thread never blocks on the wire: requests go to a worker thread
//! that owns the boxed `UserSource`, and results come back over a channel
//! as explicit outcome values. Every request carries a `Ticket`; the event
//! loop applies an outcome only when its ticket still matches the pending
//! ticket for that concern, which is what guards against a response landing
//! after the view that asked for it has moved on.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::api::{NewUser, UserRecord, UserSource};
use crate::error::Result;

/// Correlates a response with the request that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Clone, Debug)]
pub enum NetRequest {
    LoadDirectory,
    FetchUser { id: String },
    CreateUser { draft: NewUser },
    DeleteUser { id: String },
}

pub enum NetOutcome {
    DirectoryLoaded(Result<Vec<UserRecord>>),
    UserFetched(Result<Option<UserRecord>>),
    UserCreated(Result<UserRecord>),
    UserDeleted { id: String, result: Result<()> },
}

pub struct NetResponse {
    pub ticket: Ticket,
    pub outcome: NetOutcome,
}

struct Job {
    ticket: Ticket,
    request: NetRequest,
}

pub struct NetClient {
    jobs: Sender<Job>,
    responses: Receiver<NetResponse>,
    next_ticket: u64,
}

impl NetClient {
    /// Move the source onto a worker thread and return the handle the event
    /// loop talks to. The worker exits once the client is dropped.
    pub fn spawn(source: Box<dyn UserSource>) -> Self {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (resp_tx, resp_rx) = mpsc::channel::<NetResponse>();

        thread::spawn(move || {
            for job in job_rx {
                let outcome = execute(source.as_ref(), job.request);
                if resp_tx
                    .send(NetResponse {
                        ticket: job.ticket,
                        outcome,
                    })
                    .is_err()
                {
                    break;
                }
            }
        });

        Self {
            jobs: job_tx,
            responses: resp_rx,
            next_ticket: 0,
        }
    }

    /// Queue a request and hand back the ticket to match its response with.
    pub fn submit(&mut self, request: NetRequest) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        debug!(?ticket, ?request, "submitting network request");
        // Send can only fail once the worker is gone, i.e. during teardown.
        let _ = self.jobs.send(Job { ticket, request });
        ticket
    }

    /// Non-blocking poll, called once per UI tick.
    pub fn poll(&self) -> Option<NetResponse> {
        self.responses.try_recv().ok()
    }

    /// Blocking receive with a deadline; used by tests and nowhere else on
    /// the UI path.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<NetResponse> {
        self.responses.recv_timeout(timeout).ok()
    }
}

fn execute(source: &dyn UserSource, request: NetRequest) -> NetOutcome {
    match request {
        NetRequest::LoadDirectory => NetOutcome::DirectoryLoaded(source.list()),
        NetRequest::FetchUser { id } => NetOutcome::UserFetched(source.fetch(&id)),
        NetRequest::CreateUser { draft } => NetOutcome::UserCreated(source.create(&draft)),
        NetRequest::DeleteUser { id } => {
            let result = source.delete(&id);
            NetOutcome::UserDeleted { id, result }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::simple_error;

    struct StaticSource {
        records: Vec<UserRecord>,
        fail: bool,
    }

    impl UserSource for StaticSource {
        fn list(&self) -> Result<Vec<UserRecord>> {
            if self.fail {
                return Err(simple_error("listing unavailable"));
            }
            Ok(self.records.clone())
        }

        fn fetch(&self, id: &str) -> Result<Option<UserRecord>> {
            Ok(self.records.iter().find(|r| r.id == id).cloned())
        }

        fn create(&self, draft: &NewUser) -> Result<UserRecord> {
            Ok(draft.clone().with_id("99"))
        }

        fn delete(&self, id: &str) -> Result<()> {
            if self.records.iter().any(|r| r.id == id) {
                Ok(())
            } else {
                Err(simple_error("no such record"))
            }
        }
    }

    fn rec(id: &str) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "ann@x.com".into(),
            avatar: "http://a".into(),
        }
    }

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn responses_carry_the_submitted_ticket() {
        let mut net = NetClient::spawn(Box::new(StaticSource {
            records: vec![rec("1")],
            fail: false,
        }));
        let t1 = net.submit(NetRequest::LoadDirectory);
        let t2 = net.submit(NetRequest::FetchUser { id: "1".into() });

        let r1 = net.recv_timeout(WAIT).unwrap();
        let r2 = net.recv_timeout(WAIT).unwrap();
        assert_eq!(r1.ticket, t1);
        assert_eq!(r2.ticket, t2);
        assert_ne!(t1, t2);

        match r1.outcome {
            NetOutcome::DirectoryLoaded(Ok(records)) => assert_eq!(records.len(), 1),
            _ => panic!("expected directory listing"),
        }
        match r2.outcome {
            NetOutcome::UserFetched(Ok(Some(r))) => assert_eq!(r.id, "1"),
            _ => panic!("expected fetched record"),
        }
    }

    #[test]
    fn failures_travel_as_outcome_errors() {
        let mut net = NetClient::spawn(Box::new(StaticSource {
            records: vec![],
            fail: true,
        }));
        net.submit(NetRequest::LoadDirectory);
        match net.recv_timeout(WAIT).unwrap().outcome {
            NetOutcome::DirectoryLoaded(Err(e)) => {
                assert!(format!("{e}").contains("listing unavailable"));
            }
            _ => panic!("expected a load failure"),
        }
    }

    #[test]
    fn delete_outcome_names_the_target_id() {
        let mut net = NetClient::spawn(Box::new(StaticSource {
            records: vec![rec("7")],
            fail: false,
        }));
        net.submit(NetRequest::DeleteUser { id: "7".into() });
        match net.recv_timeout(WAIT).unwrap().outcome {
            NetOutcome::UserDeleted { id, result } => {
                assert_eq!(id, "7");
                assert!(result.is_ok());
            }
            _ => panic!("expected delete outcome"),
        }
    }
}
