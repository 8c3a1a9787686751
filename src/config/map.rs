//! Directive registry and the binding engine.
//!
//! A [`Map`] is bound to one block [`Node`] and an optional set of
//! [`Globals`]. Subsystems register the directives they accept, then call
//! [`Map::process`] once to match the block's children against them.
//!
//! For each registered directive the value is resolved in this order:
//!
//! 1. a single child node with the directive's name, passed to the parse callback
//! 2. the inherited global of the same name, if inheritance is enabled
//! 3. the default supplier, if any
//! 4. a [`ConfigError::MissingRequired`] error if the directive is required
//!
//! If none of these apply the output [`Slot`] keeps its current value.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use super::node::Node;
use super::value::{FromValue, Globals, Value};
use super::ConfigError;

/// Supplier of a directive's default value.
pub type DefaultFn<'a, T> = Box<dyn Fn() -> Result<T, ConfigError> + 'a>;

/// Default supplier that always yields a clone of `value`.
pub fn default_value<'a, T: Clone + 'a>(value: T) -> Option<DefaultFn<'a, T>> {
    Some(Box::new(move || Ok(value.clone())))
}

type ParseFn<'a, T> = Box<dyn Fn(&Map<'_>, &Node) -> Result<T, ConfigError> + 'a>;
type CallbackFn<'a> = Box<dyn Fn(&Map<'_>, &Node) -> Result<(), ConfigError> + 'a>;

/// Output handle a directive's resolved value is written into.
///
/// Clones share the same underlying value.
pub struct Slot<T>(Rc<RefCell<T>>);

impl<T> Slot<T> {
    pub fn new(initial: T) -> Self {
        Self(Rc::new(RefCell::new(initial)))
    }

    /// Replaces the stored value, returning the previous one.
    pub fn replace(&self, value: T) -> T {
        self.0.replace(value)
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().clone()
    }

    pub fn take(&self) -> T
    where
        T: Default,
    {
        self.0.take()
    }

    /// Consumes the slot, cloning the value if other handles still share it.
    pub fn into_inner(self) -> T
    where
        T: Clone,
    {
        match Rc::try_unwrap(self.0) {
            Ok(cell) => cell.into_inner(),
            Err(shared) => shared.borrow().clone(),
        }
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Default> Default for Slot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&self.0.borrow()).finish()
    }
}

/// Type-erased view of a registered value directive.
trait Binding {
    fn parse(&self, map: &Map<'_>, node: &Node) -> Result<(), ConfigError>;

    fn inherit(&self, name: &str, value: &Value) -> Result<(), ConfigError>;

    /// Returns `false` if the directive has no default.
    fn apply_default(&self) -> Result<bool, ConfigError>;
}

struct TypedBinding<'a, T> {
    default: Option<DefaultFn<'a, T>>,
    parse: ParseFn<'a, T>,
    store: Slot<T>,
}

impl<T: FromValue> Binding for TypedBinding<'_, T> {
    fn parse(&self, map: &Map<'_>, node: &Node) -> Result<(), ConfigError> {
        let value = (self.parse)(map, node)?;
        self.store.replace(value);
        Ok(())
    }

    fn inherit(&self, name: &str, value: &Value) -> Result<(), ConfigError> {
        let typed = T::from_value(value).ok_or_else(|| ConfigError::TypeMismatch {
            directive: name.to_string(),
            expected: T::EXPECTED,
            found: value.kind(),
        })?;
        self.store.replace(typed);
        Ok(())
    }

    fn apply_default(&self) -> Result<bool, ConfigError> {
        match &self.default {
            Some(default) => {
                self.store.replace(default()?);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

enum Handler<'a> {
    Value(Box<dyn Binding + 'a>),
    Callback(CallbackFn<'a>),
}

struct DirectiveSpec<'a> {
    name: String,
    inherit_global: bool,
    required: bool,
    handler: Handler<'a>,
}

/// Declarative directive schema bound to one configuration block.
///
/// ```
/// use directive_map::{Globals, Map, Node, Slot};
///
/// let block = Node::block(vec![Node::new("max_tries").with_args(["5"])]);
/// let globals = Globals::new().with("hostname", "mx.example.org");
///
/// let hostname = Slot::new(String::new());
/// let max_tries = Slot::new(0);
///
/// let mut map = Map::new(globals, block);
/// map.string("hostname", true, true, "", &hostname);
/// map.int("max_tries", false, false, 20, &max_tries);
/// map.process()?;
///
/// assert_eq!(hostname.get(), "mx.example.org");
/// assert_eq!(max_tries.get(), 5);
/// # Ok::<(), directive_map::ConfigError>(())
/// ```
pub struct Map<'a> {
    globals: Globals,
    node: Node,
    specs: Vec<DirectiveSpec<'a>>,
    allow_unknown: bool,
    processed: Cell<bool>,
}

impl<'a> Map<'a> {
    pub fn new(globals: Globals, node: Node) -> Self {
        Self {
            globals,
            node,
            specs: Vec::new(),
            allow_unknown: false,
            processed: Cell::new(false),
        }
    }

    /// Globals this map was created with.
    pub fn globals(&self) -> &Globals {
        &self.globals
    }

    /// Block node this map was created for.
    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn is_processed(&self) -> bool {
        self.processed.get()
    }

    /// Returns unmatched children from [`process`](Self::process) instead
    /// of failing on them.
    pub fn allow_unknown(&mut self) -> &mut Self {
        self.allow_unknown = true;
        self
    }

    /// Registers a directive with a caller-supplied parse callback.
    ///
    /// The callback receives this map and the matched child node. Inherited
    /// globals bypass the callback and are converted with [`FromValue`].
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty, already registered, or the map has
    /// already been processed.
    pub fn custom<T, P>(
        &mut self,
        name: &str,
        inherit_global: bool,
        required: bool,
        default: Option<DefaultFn<'a, T>>,
        parse: P,
        store: &Slot<T>,
    ) -> &mut Self
    where
        T: FromValue + 'a,
        P: Fn(&Map<'_>, &Node) -> Result<T, ConfigError> + 'a,
    {
        let binding = TypedBinding {
            default,
            parse: Box::new(parse),
            store: store.clone(),
        };
        self.register(DirectiveSpec {
            name: name.to_string(),
            inherit_global,
            required,
            handler: Handler::Value(Box::new(binding)),
        })
    }

    /// Registers a directive that may appear any number of times.
    ///
    /// The callback runs once per occurrence, in block order.
    pub fn callback<F>(&mut self, name: &str, callback: F) -> &mut Self
    where
        F: Fn(&Map<'_>, &Node) -> Result<(), ConfigError> + 'a,
    {
        self.register(DirectiveSpec {
            name: name.to_string(),
            inherit_global: false,
            required: false,
            handler: Handler::Callback(Box::new(callback)),
        })
    }

    fn register(&mut self, spec: DirectiveSpec<'a>) -> &mut Self {
        assert!(
            !self.processed.get(),
            "directive '{}' registered after processing",
            spec.name
        );
        assert!(!spec.name.is_empty(), "directive name must not be empty");
        assert!(
            self.specs.iter().all(|s| s.name != spec.name),
            "directive '{}' registered twice",
            spec.name
        );
        self.specs.push(spec);
        self
    }

    /// Resolves all registered directives against the bound block.
    ///
    /// Returns the children that matched no directive, which is always
    /// empty unless [`allow_unknown`](Self::allow_unknown) was called.
    pub fn process(&self) -> Result<Vec<Node>, ConfigError> {
        self.process_with(&self.globals, &self.node)
    }

    /// Same as [`process`](Self::process), but against another block and
    /// set of globals. The map's own bindings are ignored, not merged.
    pub fn process_with(&self, globals: &Globals, node: &Node) -> Result<Vec<Node>, ConfigError> {
        self.processed.set(true);

        let mut consumed = vec![false; node.children.len()];

        for spec in &self.specs {
            let binding = match &spec.handler {
                Handler::Value(binding) => binding,
                Handler::Callback(callback) => {
                    for (i, child) in node.children.iter().enumerate() {
                        if child.name == spec.name {
                            callback(self, child)?;
                            consumed[i] = true;
                        }
                    }
                    continue;
                }
            };

            let mut matches = node
                .children
                .iter()
                .enumerate()
                .filter(|(_, child)| child.name == spec.name);

            match (matches.next(), matches.next()) {
                (Some((_, first)), Some((_, second))) => {
                    return Err(ConfigError::DuplicateDirective {
                        directive: spec.name.clone(),
                        location: second.location.clone(),
                        previous: first.location.clone(),
                    });
                }
                (Some((i, child)), None) => {
                    binding.parse(self, child)?;
                    consumed[i] = true;
                    debug!(directive = %spec.name, source = "block", "directive resolved");
                }
                (None, _) => resolve_absent(spec, &**binding, globals, node)?,
            }
        }

        let mut unknown = node
            .children
            .iter()
            .zip(&consumed)
            .filter(|(_, consumed)| !**consumed)
            .map(|(child, _)| child);

        if !self.allow_unknown {
            if let Some(child) = unknown.next() {
                return Err(ConfigError::UnexpectedDirective {
                    directive: child.name.clone(),
                    location: child.location.clone(),
                });
            }
            return Ok(Vec::new());
        }

        let unknown: Vec<Node> = unknown.cloned().collect();
        if !unknown.is_empty() {
            debug!(count = unknown.len(), "passing through unknown directives");
        }
        Ok(unknown)
    }
}

fn resolve_absent(
    spec: &DirectiveSpec<'_>,
    binding: &dyn Binding,
    globals: &Globals,
    block: &Node,
) -> Result<(), ConfigError> {
    if spec.inherit_global {
        if let Some(value) = globals.get(&spec.name) {
            binding.inherit(&spec.name, value)?;
            debug!(directive = %spec.name, source = "global", "directive resolved");
            return Ok(());
        }
    }

    if binding.apply_default()? {
        debug!(directive = %spec.name, source = "default", "directive resolved");
        return Ok(());
    }

    if spec.required {
        return Err(ConfigError::MissingRequired {
            directive: spec.name.clone(),
            location: block.location.clone(),
        });
    }

    trace!(directive = %spec.name, "optional directive left unset");
    Ok(())
}

impl fmt::Debug for Map<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let directives: Vec<&str> = self.specs.iter().map(|s| s.name.as_str()).collect();
        f.debug_struct("Map")
            .field("node", &self.node.name)
            .field("directives", &directives)
            .field("allow_unknown", &self.allow_unknown)
            .field("processed", &self.processed.get())
            .finish()
    }
}
