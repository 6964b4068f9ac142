//! Integration tests wiring [`super::InteractiveHandler`] against
//! [`super::IframeRuntime`] over an in-process [`super::channel_pair`].

mod dispatch;
