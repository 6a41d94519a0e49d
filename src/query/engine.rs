//! Query definition and execution
//!
//! A [`Query`] declares how a single pass over a sequence of items builds
//! group records: counters and `enter` hooks fire per item in registration
//! order, `exit` hooks finalize each group, and an optional `end` hook
//! post-processes the ordered result.

use super::group::{Group, GroupId, Groups};
use super::predicate::Predicate;
use super::types::{to_records, Item, Record};
use crate::config::StatsConfig;
use crate::script::Token;
use serde::Serialize;
use std::cmp::Ordering;
use std::hash::Hash;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that can occur while computing statistics
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Malformed token at position {index} in query '{query}': {reason}")]
    MalformedToken {
        query: String,
        index: usize,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for statistics operations
pub type StatsResult<T> = Result<T, StatsError>;

/// Gate for counters and hooks.
pub enum Filter<T> {
    Always,
    When(Box<dyn Fn(&T) -> bool + Send + Sync>),
}

impl<T> Filter<T> {
    pub fn always() -> Self {
        Filter::Always
    }

    pub fn when(test: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Filter::When(Box::new(test))
    }

    pub fn test(&self, item: &T) -> bool {
        match self {
            Filter::Always => true,
            Filter::When(test) => test(item),
        }
    }
}

impl From<Predicate> for Filter<Token> {
    fn from(predicate: Predicate) -> Self {
        match predicate {
            Predicate::Any => Filter::Always,
            predicate => Filter::When(Box::new(move |token| predicate.matches(token))),
        }
    }
}

/// How much a matching counter adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Increment {
    By(usize),
    /// The matching item's line count
    Lines,
}

impl Increment {
    fn amount<T: Item>(self, item: &T) -> usize {
        match self {
            Increment::By(n) => n,
            Increment::Lines => item.line_count(),
        }
    }
}

/// Declarative counter: when the filter matches, add to a field of the
/// target group.
///
/// The target is the counter's own key if set, otherwise the implicit group
/// of a labelless query, otherwise the last selected group. Without any of
/// those the match is a no-op.
pub struct Counter<K, A, T = Token> {
    field: &'static str,
    access: fn(&mut A) -> &mut usize,
    filter: Filter<T>,
    increment: Increment,
    key: Option<K>,
    exclusive: bool,
}

impl<K, A, T> Counter<K, A, T> {
    pub fn new(
        field: &'static str,
        access: fn(&mut A) -> &mut usize,
        filter: impl Into<Filter<T>>,
    ) -> Self {
        Self {
            field,
            access,
            filter: filter.into(),
            increment: Increment::By(1),
            key: None,
            exclusive: false,
        }
    }

    /// Add a fixed amount instead of 1.
    pub fn by(mut self, amount: usize) -> Self {
        self.increment = Increment::By(amount);
        self
    }

    /// Add the item's line count instead of 1.
    pub fn by_lines(mut self) -> Self {
        self.increment = Increment::Lines;
        self
    }

    /// Always count into the group for `key`.
    pub fn keyed(mut self, key: K) -> Self {
        self.key = Some(key);
        self
    }

    /// A match stops evaluation of the counters registered after this one
    /// for the same item.
    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }
}

/// Read-only part of a run: query name, source items and configuration.
pub struct Env<'a, T> {
    name: &'a str,
    source: &'a [T],
    config: &'a StatsConfig,
}

impl<'a, T> Env<'a, T> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The full item sequence of this run, for nested queries.
    pub fn source(&self) -> &'a [T] {
        self.source
    }

    pub fn config(&self) -> &'a StatsConfig {
        self.config
    }

    pub fn malformed(&self, index: usize, reason: impl Into<String>) -> StatsError {
        StatsError::MalformedToken {
            query: self.name.to_string(),
            index,
            reason: reason.into(),
        }
    }
}

/// Per-run state handed to `enter` hooks.
///
/// Created fresh by every [`Query::run`] and dropped when it returns.
/// `state` holds whatever the query's hooks need to carry between items.
pub struct RunContext<'a, K, A, S, T = Token> {
    env: Env<'a, T>,
    template: &'a A,
    groups: Groups<K, A>,
    last: Option<GroupId>,
    position: usize,
    counted: bool,
    pub state: S,
}

impl<'a, K: Clone + Eq + Hash, A: Clone, S, T> RunContext<'a, K, A, S, T> {
    /// Look up or create the group for `key` and make it the last selection.
    pub fn select(&mut self, key: K) -> GroupId {
        let (id, created) = self.groups.select(key, self.template);
        if created {
            trace!(query = %self.env.name, group = %id, position = self.position, "group created");
        }
        self.last = Some(id);
        id
    }
}

impl<'a, A: Clone, S, T> RunContext<'a, (), A, S, T> {
    /// Select the implicit group of a labelless query.
    pub fn single(&mut self) -> GroupId {
        self.select(())
    }
}

impl<'a, K, A, S, T> RunContext<'a, K, A, S, T> {
    pub fn group(&self, id: GroupId) -> &Group<K, A> {
        self.groups.get(id)
    }

    pub fn group_mut(&mut self, id: GroupId) -> &mut Group<K, A> {
        self.groups.get_mut(id)
    }

    pub fn data_mut(&mut self, id: GroupId) -> &mut A {
        &mut self.groups.get_mut(id).data
    }

    /// Group most recently returned by `select`, by a hook or a counter.
    pub fn last_selected(&self) -> Option<GroupId> {
        self.last
    }

    /// Whether any counter matched the current item.
    pub fn counter_matched(&self) -> bool {
        self.counted
    }

    /// Index of the current item in the source sequence.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn source(&self) -> &'a [T] {
        self.env.source
    }

    pub fn config(&self) -> &'a StatsConfig {
        self.env.config
    }

    pub fn env(&self) -> &Env<'a, T> {
        &self.env
    }

    /// Error for the current item.
    pub fn malformed(&self, reason: impl Into<String>) -> StatsError {
        self.env.malformed(self.position, reason)
    }
}

type EnterFn<K, A, S, T> =
    Box<dyn for<'c> Fn(&T, &mut RunContext<'c, K, A, S, T>) -> StatsResult<()> + Send + Sync>;
type ExitFn<K, A, S, T> =
    Box<dyn for<'e> Fn(&mut Group<K, A>, &mut S, &Env<'e, T>) -> StatsResult<()> + Send + Sync>;
type EndFn<K, A, S, T> = Box<
    dyn for<'e> Fn(&mut Vec<Group<K, A>>, &mut S, &Env<'e, T>) -> StatsResult<()> + Send + Sync,
>;
type PrepareFn<S, T> = Box<dyn for<'e> Fn(&mut S, &Env<'e, T>) -> StatsResult<()> + Send + Sync>;

struct EnterHook<K, A, S, T> {
    filter: Filter<T>,
    callback: EnterFn<K, A, S, T>,
}

struct SortBy<A> {
    field: &'static str,
    value: fn(&A) -> f64,
}

/// A query definition.
///
/// - `K`: grouping key, written under `label_field` in [`Query::records`]
/// - `A`: accumulator; each group starts as a clone of the template
/// - `S`: ad-hoc run state (`Default` at the start of every run)
/// - `T`: item type, tokens unless the query runs over derived records
///
/// Definitions are immutable once built and can be run any number of times;
/// runs share nothing.
pub struct Query<K, A, S = (), T = Token> {
    name: String,
    label_field: Option<&'static str>,
    implicit: Option<K>,
    template: A,
    counters: Vec<Counter<K, A, T>>,
    enter: Vec<EnterHook<K, A, S, T>>,
    exit: Vec<ExitFn<K, A, S, T>>,
    prepare: Option<PrepareFn<S, T>>,
    end: Option<EndFn<K, A, S, T>>,
    sort: Option<SortBy<A>>,
}

impl<A: Clone, S: Default, T: Item> Query<(), A, S, T> {
    /// Query with a single implicit group and no label field.
    pub fn single(name: impl Into<String>, template: A) -> Self {
        let mut query = Self::labelled(name, "", template);
        query.label_field = None;
        query.implicit = Some(());
        query
    }
}

impl<K, A, S, T> Query<K, A, S, T>
where
    K: Clone + Eq + Hash,
    A: Clone,
    S: Default,
    T: Item,
{
    /// Query grouping by `K`, with keys reported under `label_field`.
    pub fn labelled(name: impl Into<String>, label_field: &'static str, template: A) -> Self {
        Self {
            name: name.into(),
            label_field: Some(label_field),
            implicit: None,
            template,
            counters: Vec::new(),
            enter: Vec::new(),
            exit: Vec::new(),
            prepare: None,
            end: None,
            sort: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label_field(&self) -> Option<&'static str> {
        self.label_field
    }

    pub fn count(mut self, counter: Counter<K, A, T>) -> Self {
        self.counters.push(counter);
        self
    }

    pub fn enter<F>(mut self, filter: impl Into<Filter<T>>, hook: F) -> Self
    where
        F: for<'c> Fn(&T, &mut RunContext<'c, K, A, S, T>) -> StatsResult<()>
            + Send
            + Sync
            + 'static,
    {
        self.enter.push(EnterHook {
            filter: filter.into(),
            callback: Box::new(hook),
        });
        self
    }

    pub fn exit<F>(mut self, hook: F) -> Self
    where
        F: for<'e> Fn(&mut Group<K, A>, &mut S, &Env<'e, T>) -> StatsResult<()>
            + Send
            + Sync
            + 'static,
    {
        self.exit.push(Box::new(hook));
        self
    }

    /// Replaces any previous prepare hook.
    pub fn prepare<F>(mut self, hook: F) -> Self
    where
        F: for<'e> Fn(&mut S, &Env<'e, T>) -> StatsResult<()> + Send + Sync + 'static,
    {
        self.prepare = Some(Box::new(hook));
        self
    }

    /// Replaces any previous end hook.
    pub fn end<F>(mut self, hook: F) -> Self
    where
        F: for<'e> Fn(&mut Vec<Group<K, A>>, &mut S, &Env<'e, T>) -> StatsResult<()>
            + Send
            + Sync
            + 'static,
    {
        self.end = Some(Box::new(hook));
        self
    }

    /// Order the result by descending `value`, ties keeping creation order.
    pub fn sort_by(mut self, field: &'static str, value: fn(&A) -> f64) -> Self {
        self.sort = Some(SortBy { field, value });
        self
    }

    /// Run the query once over `items`.
    pub fn run(&self, items: &[T], config: &StatsConfig) -> StatsResult<Vec<Group<K, A>>> {
        debug!(query = %self.name, items = items.len(), "running query");

        let mut ctx = RunContext {
            env: Env {
                name: &self.name,
                source: items,
                config,
            },
            template: &self.template,
            groups: Groups::new(),
            last: None,
            position: 0,
            counted: false,
            state: S::default(),
        };

        if let Some(prepare) = &self.prepare {
            prepare(&mut ctx.state, &ctx.env)?;
        }

        for (position, item) in items.iter().enumerate() {
            ctx.position = position;
            ctx.counted = false;
            self.apply_counters(item, &mut ctx);
            for hook in &self.enter {
                if hook.filter.test(item) {
                    (hook.callback)(item, &mut ctx)?;
                }
            }
        }

        let RunContext {
            env,
            groups,
            mut state,
            ..
        } = ctx;
        let mut result = groups.into_vec();

        for group in result.iter_mut() {
            for hook in &self.exit {
                hook(group, &mut state, &env)?;
            }
        }

        if let Some(sort) = &self.sort {
            trace!(query = %self.name, field = sort.field, "sorting result");
            let value = sort.value;
            result.sort_by(|a, b| {
                value(&b.data)
                    .partial_cmp(&value(&a.data))
                    .unwrap_or(Ordering::Equal)
            });
        }

        if let Some(end) = &self.end {
            end(&mut result, &mut state, &env)?;
        }

        debug!(query = %self.name, groups = result.len(), "query finished");
        Ok(result)
    }

    fn apply_counters(&self, item: &T, ctx: &mut RunContext<'_, K, A, S, T>) {
        for counter in &self.counters {
            if !counter.filter.test(item) {
                continue;
            }
            ctx.counted = true;
            trace!(
                query = %self.name,
                field = counter.field,
                position = ctx.position,
                "counter matched"
            );
            let target = match (&counter.key, &self.implicit) {
                (Some(key), _) | (None, Some(key)) => Some(ctx.select(key.clone())),
                (None, None) => ctx.last,
            };
            if let Some(id) = target {
                *(counter.access)(ctx.data_mut(id)) += counter.increment.amount(item);
            }
            if counter.exclusive {
                break;
            }
        }
    }

    /// Flatten a result of this query into plain records.
    pub fn records(&self, groups: &[Group<K, A>]) -> StatsResult<Vec<Record>>
    where
        K: Serialize,
        A: Serialize,
    {
        to_records(self.label_field, groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::predicate::{any, has_scene_time, is, is_dialogue, not};
    use crate::script::TokenKind;
    use serde::Serialize;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Default, PartialEq, Serialize)]
    struct Tally {
        count: usize,
        lines: usize,
    }

    fn config() -> StatsConfig {
        StatsConfig::default()
    }

    fn script() -> Vec<Token> {
        vec![
            Token::scene_heading(1, "INT. ROOM - DAY"),
            Token::action(2, "Dust.\nLight."),
            Token::character(4, "ANNA"),
            Token::dialogue(5, "Hello."),
            Token::page_break(6),
            Token::scene_heading(7, "EXT. ROAD - NIGHT"),
            Token::action(8, "Cars."),
        ]
    }

    #[test]
    fn labelless_counters_hit_implicit_group() {
        let query = Query::<(), Tally>::single("tally", Tally::default())
            .count(Counter::new("count", |t: &mut Tally| &mut t.count, is([TokenKind::SceneHeading])))
            .count(Counter::new("lines", |t: &mut Tally| &mut t.lines, is([TokenKind::Action])).by_lines());

        let result = query.run(&script(), &config()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].data, Tally { count: 2, lines: 3 });
    }

    #[test]
    fn labelless_query_without_matches_has_no_group() {
        let query = Query::<(), Tally>::single("tally", Tally::default())
            .count(Counter::new("count", |t: &mut Tally| &mut t.count, is([TokenKind::Transition])));
        assert!(query.run(&script(), &config()).unwrap().is_empty());
        assert!(query.run(&[], &config()).unwrap().is_empty());
    }

    #[test]
    fn keyed_counters_select_their_group() {
        let query = Query::<String, Tally>::labelled("times", "label", Tally::default())
            .count(Counter::new("count", |t: &mut Tally| &mut t.count, has_scene_time("NIGHT")).keyed("NIGHT".into()))
            .count(Counter::new("count", |t: &mut Tally| &mut t.count, has_scene_time("DAY")).keyed("DAY".into()));

        let result = query.run(&script(), &config()).unwrap();
        let keys: Vec<_> = result.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["DAY", "NIGHT"]);
        assert!(result.iter().all(|g| g.data.count == 1));
    }

    #[test]
    fn exclusive_counter_stops_later_counters() {
        let query = Query::<(), Tally>::single("tally", Tally::default())
            .count(Counter::new("count", |t: &mut Tally| &mut t.count, is_dialogue()).exclusive())
            .count(Counter::new("lines", |t: &mut Tally| &mut t.lines, any()).by(10));

        let result = query.run(&script(), &config()).unwrap();
        // 2 dialogue tokens stop before the catch-all; the other 5 add 10 each
        assert_eq!(result[0].data, Tally { count: 2, lines: 50 });
    }

    #[test]
    fn non_exclusive_counters_all_fire() {
        let query = Query::<(), Tally>::single("tally", Tally::default())
            .count(Counter::new("count", |t: &mut Tally| &mut t.count, is_dialogue()))
            .count(Counter::new("lines", |t: &mut Tally| &mut t.lines, any()));

        let result = query.run(&script(), &config()).unwrap();
        assert_eq!(result[0].data, Tally { count: 2, lines: 7 });
    }

    #[test]
    fn unkeyed_counter_uses_last_selection() {
        let query = Query::<usize, Tally>::labelled("scenes", "scene", Tally::default())
            .count(Counter::new("lines", |t: &mut Tally| &mut t.lines, not(is([TokenKind::SceneHeading]))).by_lines())
            .enter(is([TokenKind::SceneHeading]), |_, ctx| {
                let id = ctx.select(ctx.position());
                ctx.data_mut(id).count += 1;
                Ok(())
            });

        let result = query.run(&script(), &config()).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].key, 0);
        assert_eq!(result[0].data.lines, 4);
        assert_eq!(result[1].key, 5);
        assert_eq!(result[1].data.lines, 1);
    }

    #[test]
    fn unkeyed_counter_without_selection_is_noop() {
        let tokens = vec![Token::action(1, "Before anything.")];
        let query = Query::<usize, Tally>::labelled("scenes", "scene", Tally::default())
            .count(Counter::new("lines", |t: &mut Tally| &mut t.lines, any()).by_lines());
        assert!(query.run(&tokens, &config()).unwrap().is_empty());
    }

    #[test]
    fn enter_hooks_fire_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (first, second) = (seen.clone(), seen.clone());
        let query = Query::<(), Tally>::single("order", Tally::default())
            .enter(is([TokenKind::SceneHeading]), move |token, _| {
                first.lock().unwrap().push(format!("a{}", token.line));
                Ok(())
            })
            .enter(any(), move |token, _| {
                second.lock().unwrap().push(format!("b{}", token.line));
                Ok(())
            });

        query.run(&script()[..2], &config()).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["a1", "b1", "b2"]);
    }

    #[test]
    fn enter_hooks_see_counter_matches() {
        #[derive(Default)]
        struct Seen {
            matched: Vec<bool>,
        }
        let query = Query::<(), Tally, Seen>::single("seen", Tally::default())
            .count(Counter::new("count", |t: &mut Tally| &mut t.count, is([TokenKind::SceneHeading])))
            .enter(any(), |_, ctx| {
                let matched = ctx.counter_matched();
                ctx.state.matched.push(matched);
                Ok(())
            })
            .end(|result, state, _| {
                result[0].data.lines = state.matched.iter().filter(|m| **m).count();
                Ok(())
            });

        let result = query.run(&script(), &config()).unwrap();
        assert_eq!(result[0].data.lines, 2);
    }

    #[test]
    fn exit_observes_final_values_in_creation_order() {
        #[derive(Default)]
        struct Order {
            keys: Vec<String>,
        }
        let query = Query::<String, Tally, Order>::labelled("names", "name", Tally::default())
            .enter(is([TokenKind::Character]), |token, ctx| {
                let id = ctx.select(token.text.clone());
                ctx.data_mut(id).count += 1;
                Ok(())
            })
            .exit(|group, state, _| {
                state.keys.push(format!("{}={}", group.key, group.data.count));
                Ok(())
            })
            .end(|_, state, _| {
                assert_eq!(state.keys, vec!["B=2", "A=1"]);
                Ok(())
            });

        let tokens = vec![
            Token::character(1, "B"),
            Token::character(2, "A"),
            Token::character(3, "B"),
        ];
        query.run(&tokens, &config()).unwrap();
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let query = Query::<String, Tally>::labelled("names", "name", Tally::default())
            .sort_by("count", |t| t.count as f64)
            .enter(is([TokenKind::Character]), |token, ctx| {
                let id = ctx.select(token.text.clone());
                ctx.data_mut(id).count += 1;
                Ok(())
            });

        let tokens: Vec<_> = ["C", "A", "B", "A", "B", "D"]
            .iter()
            .enumerate()
            .map(|(i, name)| Token::character(i, *name))
            .collect();
        let keys: Vec<_> = query
            .run(&tokens, &config())
            .unwrap()
            .into_iter()
            .map(|g| g.key)
            .collect();
        assert_eq!(keys, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn end_can_append_records() {
        let query = Query::<String, Tally>::labelled("names", "name", Tally::default())
            .end(|result, _, env| {
                result.push(Group::new("TOTAL".into(), Tally { count: env.source().len(), lines: 0 }));
                Ok(())
            });
        let result = query.run(&script(), &config()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].data.count, 7);
    }

    #[test]
    fn prepare_runs_before_traversal() {
        #[derive(Default)]
        struct Page {
            current: usize,
        }
        let query = Query::<usize, Tally, Page>::labelled("pages", "page", Tally::default())
            .prepare(|state, _| {
                state.current = 1;
                Ok(())
            })
            .enter(is([TokenKind::PageBreak]), |_, ctx| {
                ctx.state.current += 1;
                Ok(())
            })
            .enter(not(is([TokenKind::PageBreak])), |_, ctx| {
                let id = ctx.select(ctx.state.current);
                ctx.data_mut(id).count += 1;
                Ok(())
            });

        let result = query.run(&script(), &config()).unwrap();
        let pages: Vec<_> = result.iter().map(|g| (g.key, g.data.count)).collect();
        assert_eq!(pages, vec![(1, 4), (2, 2)]);
    }

    #[test]
    fn hook_errors_name_query_and_position() {
        let query = Query::<(), Tally>::single("strict", Tally::default())
            .enter(is([TokenKind::PageBreak]), |_, ctx| Err(ctx.malformed("unexpected break")));

        match query.run(&script(), &config()) {
            Err(StatsError::MalformedToken { query, index, reason }) => {
                assert_eq!(query, "strict");
                assert_eq!(index, 4);
                assert_eq!(reason, "unexpected break");
            }
            other => panic!("expected malformed token error, got {:?}", other),
        }
    }

    #[test]
    fn nested_runs_are_independent() {
        let inner = Arc::new(
            Query::<(), Tally>::single("inner", Tally::default())
                .count(Counter::new("count", |t: &mut Tally| &mut t.count, any())),
        );
        let nested = inner.clone();
        let outer = Query::<(), Tally>::single("outer", Tally::default())
            .count(Counter::new("count", |t: &mut Tally| &mut t.count, is([TokenKind::Action])))
            .end(move |result, _, env| {
                let total = nested.run(env.source(), env.config())?;
                result[0].data.lines = total[0].data.count;
                Ok(())
            });

        let result = outer.run(&script(), &config()).unwrap();
        assert_eq!(result[0].data, Tally { count: 2, lines: 7 });
    }

    #[test]
    fn runs_are_idempotent() {
        let query = Query::<String, Tally>::labelled("names", "name", Tally::default())
            .enter(is([TokenKind::Character, TokenKind::SceneHeading]), |token, ctx| {
                let id = ctx.select(token.text.clone());
                ctx.data_mut(id).lines += token.line_count();
                Ok(())
            });
        let tokens = script();
        let first = query.run(&tokens, &config()).unwrap();
        let second = query.run(&tokens, &config()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn derived_queries_run_over_groups() {
        let scenes = vec![
            Group::new(0usize, Tally { count: 3, lines: 0 }),
            Group::new(1usize, Tally { count: 1, lines: 0 }),
        ];
        let query = Query::<(), Tally, (), Group<usize, Tally>>::single("sum", Tally::default())
            .enter(Filter::when(|scene: &Group<usize, Tally>| scene.data.count > 1), |scene, ctx| {
                let id = ctx.single();
                ctx.data_mut(id).count += scene.data.count;
                Ok(())
            });
        let result = query.run(&scenes, &config()).unwrap();
        assert_eq!(result[0].data.count, 3);
    }

    #[test]
    fn records_include_label_field() {
        let query = Query::<String, Tally>::labelled("names", "name", Tally::default())
            .enter(is([TokenKind::Character]), |token, ctx| {
                let id = ctx.select(token.text.clone());
                ctx.data_mut(id).count += 1;
                Ok(())
            });
        let result = query.run(&script(), &config()).unwrap();
        let records = query.records(&result).unwrap();
        assert_eq!(records[0]["name"], "ANNA");
        assert_eq!(records[0]["count"], 1);
    }

    #[test]
    fn query_reports_name_and_label_field() {
        let labelled = Query::<String, Tally>::labelled("names", "name", Tally::default());
        assert_eq!(labelled.name(), "names");
        assert_eq!(labelled.label_field(), Some("name"));

        let single = Query::<(), Tally>::single("tally", Tally::default());
        assert_eq!(single.name(), "tally");
        assert_eq!(single.label_field(), None);
    }

    #[test]
    fn counter_keeps_its_field_name() {
        let counter: Counter<(), Tally> = Counter::new("lines", |t: &mut Tally| &mut t.lines, any());
        assert_eq!(counter.field(), "lines");
    }

    #[test]
    fn queries_are_send_and_sync() {
        fn assert_send_sync<Q: Send + Sync>(_: &Q) {}
        let query = Query::<(), Tally>::single("tally", Tally::default());
        assert_send_sync(&query);
    }
}
