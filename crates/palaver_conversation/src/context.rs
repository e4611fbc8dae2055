//! Named, lifespan-bounded parameter bags (protocol 2 only).
//!
//! The platform sends fully-qualified context names; the store keys by the
//! logical name and re-attaches the session prefix on the way out. One
//! reserved context carries the session data across turns.

use indexmap::IndexMap;
use palaver_wire::nlu;
use serde_json::{Map, Value};

/// Reserved context name carrying the serialized session data.
pub const SESSION_DATA_CONTEXT: &str = "_session_data";

/// Lifespan of the reserved session context. Large enough to outlive any
/// realistic conversation, refreshed on every turn anyway.
pub const SESSION_DATA_LIFESPAN: u32 = 99;

/// Separator between the session prefix and the logical context name.
const CONTEXT_NAME_SEPARATOR: char = '/';

/// An incoming context, as sent by the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    /// The fully-qualified wire name.
    pub name: String,

    /// Turns remaining.
    pub lifespan: u32,

    pub parameters: Map<String, Value>,
}

/// A context declared by the handler for the turns ahead.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputContext {
    pub lifespan: u32,

    pub parameters: Option<Map<String, Value>>,
}

/// The split input/output views over the turn's contexts.
#[derive(Debug, Clone, Default)]
pub struct ContextValues {
    input: IndexMap<String, Context>,
    output: IndexMap<String, OutputContext>,
    session: Option<String>,
}

impl ContextValues {
    /// Build the input view from the platform's output-context list, keyed by
    /// the logical (prefix-stripped) name.
    pub fn new(contexts: &[nlu::Context], session: Option<&str>) -> Self {
        let mut input = IndexMap::new();

        for context in contexts {
            let name = logical_name(&context.name).to_owned();
            input.insert(name, Context {
                name: context.name.clone(),
                lifespan: context.lifespan_count,
                parameters: context.parameters.clone(),
            });
        }

        Self {
            input,
            output: IndexMap::new(),
            session: session.map(str::to_owned),
        }
    }

    /// The incoming context by logical name.
    pub fn get(&self, name: &str) -> Option<&Context> {
        self.input.get(name)
    }

    /// Declare a context for the turns ahead.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        lifespan: u32,
        parameters: Option<Map<String, Value>>,
    ) {
        self.output.insert(name.into(), OutputContext {
            lifespan,
            parameters,
        });
    }

    /// Expire a context after this turn.
    pub fn delete(&mut self, name: impl Into<String>) {
        self.set(name, 0, None);
    }

    /// Iterate the incoming contexts in wire order.
    pub fn input(&self) -> impl Iterator<Item = (&str, &Context)> {
        self.input.iter().map(|(name, ctx)| (name.as_str(), ctx))
    }

    /// Serialize the output view back into the platform's fully-qualified
    /// naming scheme.
    pub fn serialize(&self) -> Vec<nlu::Context> {
        let session = self.session.as_deref().unwrap_or_default();

        self.output
            .iter()
            .map(|(name, context)| nlu::Context {
                name: format!("{session}{CONTEXT_NAME_SEPARATOR}contexts{CONTEXT_NAME_SEPARATOR}{name}"),
                lifespan_count: context.lifespan,
                parameters: context.parameters.clone().unwrap_or_default(),
            })
            .collect()
    }
}

/// The trailing path segment of a fully-qualified context name.
fn logical_name(name: &str) -> &str {
    name.rsplit(CONTEXT_NAME_SEPARATOR).next().unwrap_or(name)
}
