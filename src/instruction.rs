//! The instruction contract: caller-supplied rewrite logic

use crate::component::Component;
use crate::template::TextPart;

/// Error raised by an instruction hook, passed through to the caller as-is
pub type InstructionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Lifecycle notifications of one transformation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Before the analyze phase. Instructions holding state should reset here.
    Start,
    /// Analysis is complete, templates are about to be rewritten
    Replace,
    /// The run is over, successfully or not
    End,
}

/// Rewrite logic applied to every tag and attribute of every reachable template.
///
/// Only [`Instruction::replace`] is required. The other hooks default to no-ops.
pub trait Instruction<D> {
    /// Decide what to do with one part of a template.
    ///
    /// Returns `None` to leave the part as it is. For a [`TextPart::Tag`] the
    /// returned text is inserted right after the tag name. For a
    /// [`TextPart::Attr`] it replaces the attribute including its leading
    /// whitespace, so `Some(String::new())` deletes the attribute.
    fn replace(
        &mut self,
        part: &TextPart<'_, '_>,
        component: &Component<D>,
    ) -> Result<Option<String>, InstructionError>;

    /// Lifecycle notification
    fn event(&mut self, _event: Event) -> Result<(), InstructionError> {
        Ok(())
    }

    /// Look at a component before anything is rewritten.
    ///
    /// `tag` is `None` only for the root. Declared children get the tag they
    /// are declared under, and registry entries get their registered tag
    /// rather than `None`.
    fn analyze(&mut self, _tag: Option<&str>, _component: &Component<D>) -> Result<(), InstructionError> {
        Ok(())
    }

    /// Substitute the base definition of a rewritten component. `None` keeps the original.
    fn modify_component(&mut self, _component: &Component<D>) -> Result<Option<D>, InstructionError> {
        Ok(None)
    }
}

impl<D, I: Instruction<D> + ?Sized> Instruction<D> for &mut I {
    fn replace(
        &mut self,
        part: &TextPart<'_, '_>,
        component: &Component<D>,
    ) -> Result<Option<String>, InstructionError> {
        (**self).replace(part, component)
    }

    fn event(&mut self, event: Event) -> Result<(), InstructionError> {
        (**self).event(event)
    }

    fn analyze(&mut self, tag: Option<&str>, component: &Component<D>) -> Result<(), InstructionError> {
        (**self).analyze(tag, component)
    }

    fn modify_component(&mut self, component: &Component<D>) -> Result<Option<D>, InstructionError> {
        (**self).modify_component(component)
    }
}

impl<D, I: Instruction<D> + ?Sized> Instruction<D> for Box<I> {
    fn replace(
        &mut self,
        part: &TextPart<'_, '_>,
        component: &Component<D>,
    ) -> Result<Option<String>, InstructionError> {
        (**self).replace(part, component)
    }

    fn event(&mut self, event: Event) -> Result<(), InstructionError> {
        (**self).event(event)
    }

    fn analyze(&mut self, tag: Option<&str>, component: &Component<D>) -> Result<(), InstructionError> {
        (**self).analyze(tag, component)
    }

    fn modify_component(&mut self, component: &Component<D>) -> Result<Option<D>, InstructionError> {
        (**self).modify_component(component)
    }
}

/// An instruction built from a closure over `replace` alone
pub struct ReplaceFn<F>(F);

/// Wrap a closure deciding replacements into an [`Instruction`]
pub fn replace_fn<F>(f: F) -> ReplaceFn<F>
where
    F: FnMut(&TextPart<'_, '_>) -> Option<String>,
{
    ReplaceFn(f)
}

impl<D, F> Instruction<D> for ReplaceFn<F>
where
    F: FnMut(&TextPart<'_, '_>) -> Option<String>,
{
    fn replace(
        &mut self,
        part: &TextPart<'_, '_>,
        _component: &Component<D>,
    ) -> Result<Option<String>, InstructionError> {
        Ok((self.0)(part))
    }
}
