//! Defines the application routes.

use crate::components::{AppShell, StatusPage};
use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq, Debug)]
#[rustfmt::skip]
pub enum Route {
    #[layout(AppShell)]
        #[route("/")]
        StatusPage {},
}
