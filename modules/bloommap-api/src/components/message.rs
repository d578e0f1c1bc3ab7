use dioxus::prelude::*;

use super::layout::Layout;
use super::UserView;
use crate::templates::render_to_html;

/// Plain notice page: not found, sign-in required, and similar.
#[allow(non_snake_case)]
#[component]
fn MessagePage(
    #[props(!optional)] user: Option<UserView>,
    title: String,
    message: String,
    back_href: String,
    back_label: String,
) -> Element {
    rsx! {
        Layout { title: title.clone(), active_page: String::new(), user: user,
            div { class: "max-w-lg mx-auto text-center py-16",
                h2 { class: "text-2xl font-semibold mb-2", "{title}" }
                p { class: "text-gray-500 mb-6", "{message}" }
                a { href: "{back_href}", class: "inline-block px-4 py-2 bg-rose-500 text-white rounded no-underline hover:bg-rose-600",
                    "{back_label}"
                }
            }
        }
    }
}

pub fn render_message(
    user: Option<UserView>,
    title: &str,
    message: &str,
    back_href: &str,
    back_label: &str,
) -> String {
    let mut dom = VirtualDom::new_with_props(
        MessagePage,
        MessagePageProps {
            user,
            title: title.to_string(),
            message: message.to_string(),
            back_href: back_href.to_string(),
            back_label: back_label.to_string(),
        },
    );
    dom.rebuild_in_place();
    render_to_html(&dom)
}
