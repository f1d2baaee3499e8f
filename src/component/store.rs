//! Component values and the arena that owns them

use std::fmt;

/// Identity of a component inside a [`ComponentStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(usize);

impl ComponentId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component #{}", self.0)
    }
}

/// A UI component: its template, the child components its template uses, and
/// the host definition everything else is delegated to.
#[derive(Debug, Clone, PartialEq)]
pub struct Component<D> {
    template: String,
    /// Declared children as (tag name, component), in declaration order
    children: Vec<(String, ComponentId)>,
    base: D,
}

impl<D> Component<D> {
    pub fn new(template: impl Into<String>, base: D) -> Self {
        Self {
            template: template.into(),
            children: Vec::new(),
            base,
        }
    }

    /// Declare a child component used under `tag`. Redeclaring a tag replaces it in place.
    pub fn with_child(mut self, tag: impl Into<String>, child: ComponentId) -> Self {
        self.set_child(tag, child);
        self
    }

    pub fn set_child(&mut self, tag: impl Into<String>, child: ComponentId) {
        let tag = tag.into();
        match self.children.iter_mut().find(|(t, _)| *t == tag) {
            Some(entry) => entry.1 = child,
            None => self.children.push((tag, child)),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Declared children in declaration order
    pub fn children(&self) -> impl Iterator<Item = (&str, ComponentId)> + '_ {
        self.children.iter().map(|(tag, id)| (tag.as_str(), *id))
    }

    /// Child declared under `tag`
    pub fn child(&self, tag: &str) -> Option<ComponentId> {
        self.children
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, id)| *id)
    }

    /// Host definition of this component
    pub fn base(&self) -> &D {
        &self.base
    }
}

/// Arena of components. Ids are only meaningful for the store that issued them.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentStore<D> {
    components: Vec<Component<D>>,
}

impl<D> Default for ComponentStore<D> {
    fn default() -> Self {
        Self {
            components: Vec::new(),
        }
    }
}

impl<D> ComponentStore<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component and return its id
    pub fn insert(&mut self, component: Component<D>) -> ComponentId {
        self.components.push(component);
        ComponentId(self.components.len() - 1)
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component<D>> {
        self.components.get(id.0)
    }

    /// Mutable access, mainly for wiring up cyclic references after insertion
    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component<D>> {
        self.components.get_mut(id.0)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        id.0 < self.components.len()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, &Component<D>)> {
        self.components
            .iter()
            .enumerate()
            .map(|(i, c)| (ComponentId(i), c))
    }

    pub(crate) fn from_components(components: Vec<Component<D>>) -> Self {
        Self { components }
    }

    pub(crate) fn id_at(index: usize) -> ComponentId {
        ComponentId(index)
    }
}

/// A component store together with the root component to transform
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentGraph<D> {
    store: ComponentStore<D>,
    root: ComponentId,
}

impl<D> ComponentGraph<D> {
    pub fn new(store: ComponentStore<D>, root: ComponentId) -> Self {
        Self { store, root }
    }

    /// A graph made of a single component without children
    pub fn single(template: impl Into<String>, base: D) -> Self {
        let mut store = ComponentStore::new();
        let root = store.insert(Component::new(template, base));
        Self { store, root }
    }

    pub fn root(&self) -> ComponentId {
        self.root
    }

    pub fn root_component(&self) -> Option<&Component<D>> {
        self.store.get(self.root)
    }

    pub fn store(&self) -> &ComponentStore<D> {
        &self.store
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component<D>> {
        self.store.get(id)
    }

    /// Follow a path of child tags from the root
    pub fn find(&self, path: &[&str]) -> Option<&Component<D>> {
        let mut current = self.root_component()?;
        for tag in path {
            current = self.store.get(current.child(tag)?)?;
        }
        Some(current)
    }

    pub fn into_store(self) -> ComponentStore<D> {
        self.store
    }
}
