use crate::models::{Action, Message, SlotDescriptor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affordance {
    OpenBookingFlow {
        label: String,
        slots: Vec<SlotDescriptor>,
    },
    Navigate {
        label: String,
        href: String,
    },
}

pub fn resolve(action: Option<&Action>) -> Option<Affordance> {
    match action? {
        Action::BookingSuggestion { label, slots } => Some(Affordance::OpenBookingFlow {
            label: label.clone(),
            slots: slots.clone(),
        }),
        Action::Link { label, href } if !href.is_empty() => Some(Affordance::Navigate {
            label: label.clone(),
            href: href.clone(),
        }),
        Action::Link { .. } => None,
    }
}

pub fn resolve_message(message: &Message) -> Option<Affordance> {
    resolve(message.action.as_ref())
}
