//! Two-phase transformation of a component graph
//!
//! A run first walks every registered and reachable component so the
//! instruction can gather graph-wide state, then rewrites the root and
//! everything below it into a new graph of the same shape.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use super::config::CpuConfig;
use super::registry::Registry;
use super::store::{Component, ComponentGraph, ComponentId, ComponentStore};
use crate::error::CpuError;
use crate::instruction::{Event, Instruction};
use crate::template::modify_template;

/// Applies an instruction to component graphs.
///
/// The instruction may keep state between the analyze and replace phases of
/// a run; it is told about each run through [`Event`] notifications.
pub struct Cpu<I> {
    instruction: I,
    config: CpuConfig,
}

impl<I> Cpu<I> {
    pub fn new(instruction: I) -> Self {
        Self {
            instruction,
            config: CpuConfig::default(),
        }
    }

    /// Set the run configuration
    pub fn with_config(mut self, config: CpuConfig) -> Self {
        self.config = config;
        self
    }

    pub fn instruction(&self) -> &I {
        &self.instruction
    }

    pub fn instruction_mut(&mut self) -> &mut I {
        &mut self.instruction
    }

    pub fn into_instruction(self) -> I {
        self.instruction
    }

    /// Transform `graph`, treating `registry` as the globally available components.
    ///
    /// Notifies [`Event::Start`], analyzes every registered component and then
    /// every component reachable from the root, notifies [`Event::Replace`],
    /// rewrites the root's subtree and finally notifies [`Event::End`]. `End`
    /// is sent even when a phase fails. Each component is visited once per
    /// phase, so shared children stay shared and cycles are reproduced rather
    /// than followed forever.
    pub fn process<D>(
        &mut self,
        graph: &ComponentGraph<D>,
        registry: &Registry,
    ) -> Result<ComponentGraph<D>, CpuError>
    where
        D: Clone,
        I: Instruction<D>,
    {
        self.instruction
            .event(Event::Start)
            .map_err(CpuError::Instruction)?;

        let result = self.run(graph, registry);
        if let Err(err) = &result {
            debug!(error = %err, "transformation aborted");
        }

        let end = self.instruction.event(Event::End).map_err(CpuError::Instruction);
        match (result, end) {
            (Ok(graph), Ok(())) => Ok(graph),
            (Err(err), _) | (Ok(_), Err(err)) => Err(err),
        }
    }

    fn run<D>(&mut self, graph: &ComponentGraph<D>, registry: &Registry) -> Result<ComponentGraph<D>, CpuError>
    where
        D: Clone,
        I: Instruction<D>,
    {
        debug!(globals = registry.len(), "analyze phase");
        let mut visited = HashSet::new();
        for (tag, id) in registry.iter() {
            self.analyze_component(graph.store(), Some(tag), id, &mut visited)?;
        }
        self.analyze_component(graph.store(), None, graph.root(), &mut visited)?;

        self.instruction
            .event(Event::Replace)
            .map_err(CpuError::Instruction)?;

        debug!(components = visited.len(), "replace phase");
        let mut pass = ReplacePass {
            store: graph.store(),
            config: &self.config,
            mapped: HashMap::new(),
            slots: Vec::new(),
        };
        let root = pass.process(graph.root(), &mut self.instruction)?;

        // every reserved slot is filled before `process` returns
        let components = pass.slots.into_iter().flatten().collect();
        Ok(ComponentGraph::new(ComponentStore::from_components(components), root))
    }

    fn analyze_component<D>(
        &mut self,
        store: &ComponentStore<D>,
        tag: Option<&str>,
        id: ComponentId,
        visited: &mut HashSet<ComponentId>,
    ) -> Result<(), CpuError>
    where
        I: Instruction<D>,
    {
        if !visited.insert(id) {
            return Ok(());
        }
        let component = store.get(id).ok_or(CpuError::UnknownComponent(id))?;
        trace!(component = %id, tag = ?tag, "analyze");
        self.instruction
            .analyze(tag, component)
            .map_err(CpuError::Instruction)?;

        for (child_tag, child) in component.children() {
            self.analyze_component(store, Some(child_tag), child, visited)?;
        }
        Ok(())
    }
}

/// State of the replace phase: which originals already have a rewritten copy
struct ReplacePass<'g, D> {
    store: &'g ComponentStore<D>,
    config: &'g CpuConfig,
    mapped: HashMap<ComponentId, ComponentId>,
    slots: Vec<Option<Component<D>>>,
}

impl<'g, D: Clone> ReplacePass<'g, D> {
    fn process<I>(&mut self, id: ComponentId, instruction: &mut I) -> Result<ComponentId, CpuError>
    where
        I: Instruction<D> + ?Sized,
    {
        if let Some(&new_id) = self.mapped.get(&id) {
            return Ok(new_id);
        }

        let store = self.store;
        let component = store.get(id).ok_or(CpuError::UnknownComponent(id))?;

        // reserve the new id first so cycles back to this component resolve to it
        let new_id = ComponentStore::<D>::id_at(self.slots.len());
        self.slots.push(None);
        self.mapped.insert(id, new_id);

        let template = modify_template(component.template(), component, instruction)
            .map_err(|err| CpuError::from_modify(id, err))?;
        if self.config.log_templates {
            debug!(component = %id, before = component.template(), after = %template, "template rewritten");
        } else {
            trace!(component = %id, changed = template != component.template(), "template rewritten");
        }

        let mut children = Vec::new();
        for (tag, child) in component.children() {
            children.push((tag, self.process(child, instruction)?));
        }

        let base = match instruction
            .modify_component(component)
            .map_err(CpuError::Instruction)?
        {
            Some(base) => {
                trace!(component = %id, "base substituted");
                base
            }
            None => component.base().clone(),
        };

        let rewritten = children
            .into_iter()
            .fold(Component::new(template, base), |c, (tag, child)| c.with_child(tag, child));
        self.slots[new_id.index()] = Some(rewritten);
        Ok(new_id)
    }
}
