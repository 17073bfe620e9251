#![allow(dead_code)]

use crux_core::testing::AppTester;
use graphsync::{
    Address, App, Effect, Event, FollowKind, FollowListInfo, FollowListRequest, Identity, Model,
    MutationError, Notification, NotifyOperation, Page, QueryError, QueryOperation, QueryOutput,
    SearchResult, SocialOperation, ViewModel,
};

pub fn addr(n: u8) -> Address {
    Address::parse(format!("0x{n:040x}")).unwrap()
}

pub fn ident(n: u8) -> Identity {
    Identity::new(addr(n))
}

/// Follow edges kept in insertion order, paged with offset cursors.
#[derive(Default)]
pub struct FakeGraph {
    edges: Vec<(Address, Address)>,
    fail_query: Option<QueryError>,
    fail_mutation: Option<MutationError>,
    pub query_calls: usize,
    pub mutation_calls: usize,
}

impl FakeGraph {
    pub fn add_follow(&mut self, from: u8, to: u8) {
        self.edges.push((addr(from), addr(to)));
    }

    pub fn follows(&self, from: &Address, to: &Address) -> bool {
        self.edges.iter().any(|(f, t)| f == from && t == to)
    }

    pub fn fail_next_query(&mut self, error: QueryError) {
        self.fail_query = Some(error);
    }

    pub fn fail_next_mutation(&mut self, error: MutationError) {
        self.fail_mutation = Some(error);
    }

    fn query(&mut self, operation: &QueryOperation) -> QueryOutput {
        self.query_calls += 1;
        let failure = self.fail_query.take();
        match operation {
            QueryOperation::SearchUserInfo { from, to, .. } => {
                QueryOutput::SearchUserInfo(match failure {
                    Some(e) => Err(e),
                    None => Ok(SearchResult::new(
                        Identity::new(to.clone()),
                        self.follows(from, to),
                    )),
                })
            }
            QueryOperation::FollowListInfo(request) => QueryOutput::FollowListInfo(match failure {
                Some(e) => Err(e),
                None => Ok(self.lists(request)),
            }),
        }
    }

    fn lists(&self, request: &FollowListRequest) -> FollowListInfo {
        let followers: Vec<_> = self
            .edges
            .iter()
            .filter(|(_, t)| t == &request.address)
            .map(|(f, _)| f.clone())
            .collect();
        let followings: Vec<_> = self
            .edges
            .iter()
            .filter(|(f, _)| f == &request.address)
            .map(|(_, t)| t.clone())
            .collect();
        FollowListInfo {
            follower_count: followers.len() as i64,
            following_count: followings.len() as i64,
            followers: page(&followers, request, FollowKind::Followers),
            followings: page(&followings, request, FollowKind::Followings),
        }
    }

    fn mutate(&mut self, actor: &Address, operation: &SocialOperation) -> Result<(), MutationError> {
        self.mutation_calls += 1;
        if let Some(e) = self.fail_mutation.take() {
            return Err(e);
        }
        match operation {
            SocialOperation::Follow { target, .. } => {
                if self.follows(actor, target) {
                    return Err(MutationError::Rejected("already following".into()));
                }
                self.edges.push((actor.clone(), target.clone()));
            }
            SocialOperation::Unfollow { target, .. } => {
                self.edges.retain(|(f, t)| !(f == actor && t == target));
            }
        }
        Ok(())
    }
}

fn page(all: &[Address], request: &FollowListRequest, kind: FollowKind) -> Page {
    let Some(first) = request.first(kind) else {
        return Page::default();
    };
    let start = request
        .after(kind)
        .and_then(|c| c.parse::<usize>().ok())
        .unwrap_or(0)
        .min(all.len());
    let end = (start + first as usize).min(all.len());
    let items = all[start..end].iter().cloned().map(Identity::new).collect();
    let cursor = (end > start).then(|| end.to_string());
    Page::new(items, cursor, end < all.len())
}

/// Plays the shell: performs effects against a [`FakeGraph`] and feeds the
/// resulting events back into the app.
pub struct Shell {
    pub app: AppTester<App, Effect>,
    pub model: Model,
    pub graph: FakeGraph,
    pub notifications: Vec<Notification>,
    /// Wallet that signs mutations; outlives a disconnect.
    signer: Option<Address>,
}

impl Shell {
    pub fn new(graph: FakeGraph) -> Self {
        Self {
            app: AppTester::default(),
            model: Model::default(),
            graph,
            notifications: Vec::new(),
            signer: None,
        }
    }

    pub fn view(&self) -> ViewModel {
        self.app.view(&self.model)
    }

    /// Sends `event` and returns its effects unanswered.
    pub fn send(&mut self, event: Event) -> Vec<Effect> {
        self.app.update(event, &mut self.model).effects
    }

    /// Sends `event` and answers everything it leads to.
    pub fn run(&mut self, event: Event) {
        let effects = self.send(event);
        self.settle(effects);
    }

    pub fn connect(&mut self, n: u8) {
        self.signer = Some(addr(n));
        self.run(Event::SessionChanged(Some(addr(n))));
    }

    /// Answers held effects, as late responses would arrive.
    pub fn settle(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            let events = match effect {
                Effect::Query(mut request) => {
                    let output = self.graph.query(&request.operation);
                    self.app.resolve(&mut request, output).unwrap().events
                }
                Effect::Social(mut request) => {
                    let actor = self.signer.clone().unwrap();
                    let output = self.graph.mutate(&actor, &request.operation);
                    self.app.resolve(&mut request, output).unwrap().events
                }
                Effect::Notify(request) => {
                    let NotifyOperation::Show(notification) = request.operation.clone();
                    self.notifications.push(notification);
                    Vec::new()
                }
                Effect::Render(_) => Vec::new(),
            };
            for event in events {
                self.run(event);
            }
        }
    }

    /// Answers every follow-list query in `effects` with `info` instead of
    /// asking the graph.
    pub fn answer(&mut self, effects: Vec<Effect>, info: &FollowListInfo) {
        for effect in effects {
            match effect {
                Effect::Query(mut request) => {
                    let output = QueryOutput::FollowListInfo(Ok(info.clone()));
                    let events = self.app.resolve(&mut request, output).unwrap().events;
                    for event in events {
                        self.run(event);
                    }
                }
                other => self.settle(vec![other]),
            }
        }
    }

    pub fn latest_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }
}

pub fn queries(effects: &[Effect]) -> Vec<QueryOperation> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Query(request) => Some(request.operation.clone()),
            _ => None,
        })
        .collect()
}

pub fn has_social(effects: &[Effect]) -> bool {
    effects.iter().any(|e| matches!(e, Effect::Social(_)))
}
