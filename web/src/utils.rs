use gloo::storage::{LocalStorage, Storage};
use serde::Serialize;
use serde::de::DeserializeOwned;
use yew::prelude::*;

/// Types persisted in localStorage under a fixed, versioned key.
pub(crate) trait StorageKey: Sized {
    const KEY: &'static str;

    fn local_restore() -> Option<Self>
    where
        Self: DeserializeOwned,
    {
        LocalStorage::get(Self::KEY).ok()
    }

    fn local_or_default() -> Self
    where
        Self: DeserializeOwned + Default,
    {
        Self::local_restore().unwrap_or_default()
    }

    fn local_save(&self)
    where
        Self: Serialize,
    {
        if let Err(err) = LocalStorage::set(Self::KEY, self) {
            log::error!("Could not save {} to local storage: {:?}", Self::KEY, err);
        }
    }

    fn local_clear() {
        LocalStorage::delete(Self::KEY);
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    #[prop_or_default]
    pub children: Html,
}

/// Helper component to attatch the contents into the document.body instead of in the place where it's used.
#[function_component]
pub(crate) fn Modal(props: &ModalProps) -> Html {
    let modal_host = gloo::utils::body();
    create_portal(props.children.clone(), modal_host.into())
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// Three-digit display format used by the nav counters.
pub(crate) fn format_for_counter(num: u32) -> String {
    match num {
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_zero_padded_to_three_digits() {
        assert_eq!(format_for_counter(0), "000");
        assert_eq!(format_for_counter(7), "007");
        assert_eq!(format_for_counter(64), "064");
        assert_eq!(format_for_counter(999), "999");
    }

    #[test]
    fn counter_saturates_at_three_digits() {
        assert_eq!(format_for_counter(1000), "999");
        assert_eq!(format_for_counter(u32::MAX), "999");
    }
}
