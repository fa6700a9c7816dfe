//! Alarm action capability.

use tracing::debug;

use crate::policy::ActionRef;

/// Anything an alarm can invoke when it changes state.
pub trait AlarmAction {
    /// The reference the alarm stores in its action list.
    fn alarm_action_ref(&self) -> ActionRef;
}

/// The action list of one alarm state, in bind order.
#[derive(Debug, Clone, Default)]
pub struct AlarmActions {
    refs: Vec<ActionRef>,
}

impl AlarmActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an action. Binding the same action twice has no effect.
    pub fn bind(&mut self, action: &dyn AlarmAction) {
        let reference = action.alarm_action_ref();
        if self.refs.contains(&reference) {
            debug!(action = %reference, "alarm action already bound");
            return;
        }
        self.refs.push(reference);
    }

    pub fn refs(&self) -> &[ActionRef] {
        &self.refs
    }
}
