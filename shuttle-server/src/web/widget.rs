//! Widget-JSON element model.
//!
//! The content-management front end renders pages from a JSON document of
//! typed UI elements, each tagged with an `elementType`. Only the element
//! types this service actually emits are modeled; everything serializes with
//! camelCase keys and omits unset optional fields, matching what the CMS
//! expects byte-for-byte.

use serde::Serialize;

/// A complete widget page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub metadata: Metadata,
    pub content_container_width: &'static str,
    pub header: Vec<Element>,
    pub content: Vec<Element>,
    pub element_fields: serde_json::Value,
}

impl Page {
    /// An empty full-width page shell.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            content_container_width: "full",
            header: Vec::new(),
            content: Vec::new(),
            element_fields: serde_json::json!({}),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

/// Page metadata envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub version: &'static str,
    pub banners: Vec<serde_json::Value>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            version: "2.0",
            banners: Vec::new(),
        }
    }
}

/// Any renderable element, tagged for the CMS renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "elementType", rename_all = "camelCase")]
pub enum Element {
    Divider(Divider),
    BlockHeading(BlockHeading),
    Hero(Hero),
    HeroHeading(HeroHeading),
    HeroBreadcrumbs(HeroBreadcrumbs),
    BreadcrumbItem(BreadcrumbItem),
    ContentCard(ContentCard),
    CardSet(CardSet),
    StatusList(StatusList),
    Detail(Detail),
    Collapsible(Collapsible),
    Form(Form),
    FormInputAssistedSelect(FormInputAssistedSelect),
    FormButton(FormButton),
    LinkButton(LinkButton),
    ResponsiveTwoColumn(ResponsiveTwoColumn),
}

macro_rules! element_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Element {
                fn from(value: $variant) -> Self {
                    Element::$variant(value)
                }
            }
        )*
    };
}

element_from!(
    Divider,
    BlockHeading,
    Hero,
    HeroHeading,
    HeroBreadcrumbs,
    BreadcrumbItem,
    ContentCard,
    CardSet,
    StatusList,
    Detail,
    Collapsible,
    Form,
    FormInputAssistedSelect,
    FormButton,
    LinkButton,
    ResponsiveTwoColumn,
);

/// A relative link target.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub relative_path: String,
}

impl Link {
    pub fn relative(path: impl Into<String>) -> Self {
        Self {
            relative_path: path.into(),
        }
    }
}

/// Per-breakpoint visibility toggles; unset breakpoints keep their default.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiveVisibility {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xsmall: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xlarge: Option<bool>,
}

impl ResponsiveVisibility {
    /// Hidden on phone-sized breakpoints, shown on larger ones.
    pub fn desktop_only() -> Self {
        Self {
            xsmall: Some(false),
            small: Some(false),
            ..Self::default()
        }
    }

    /// Hidden on desktop-sized breakpoints, shown on smaller ones.
    pub fn mobile_only() -> Self {
        Self {
            medium: Some(false),
            large: Some(false),
            xlarge: Some(false),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Divider {
    pub border_style: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<String>,
}

impl Divider {
    /// An invisible spacer with the given top margin.
    pub fn spacer(margin_top: impl Into<String>) -> Self {
        Self {
            border_style: "none",
            margin_top: Some(margin_top.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeading {
    pub heading: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub height: &'static str,
    pub content_container_width: &'static str,
    pub background_image: HeroBackground,
    pub content: Vec<Element>,
}

impl Hero {
    /// The standard fluid hero with a solid overlay.
    pub fn solid(overlay_color: impl Into<String>, content: Vec<Element>) -> Self {
        Self {
            height: "fluid",
            content_container_width: "wide",
            background_image: HeroBackground {
                overlay_type: "solid",
                overlay_color: overlay_color.into(),
            },
            content,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroBackground {
    pub overlay_type: &'static str,
    pub overlay_color: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroHeading {
    pub heading: String,
    pub responsive_scaling: bool,
    pub font_size: &'static str,
    pub text_color: String,
    pub text_alignment: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroBreadcrumbs {
    pub id: String,
    pub separator_character: &'static str,
    pub ellipsize: bool,
    pub separator_color: String,
    pub items: Vec<Element>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Link>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentCard {
    pub size: &'static str,
    pub id: String,
    pub label: String,
    pub title: String,
    pub description: String,
    pub description_line_clamp: u8,
    pub label_line_clamp: u8,
    pub label_text_color: String,
    pub title_text_color: String,
    pub url: Link,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSet {
    pub id: String,
    pub ajax_loading_indicator: &'static str,
    pub ajax_loading_message: String,
    pub no_items_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsive_visibility: Option<ResponsiveVisibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initially_hidden: Option<bool>,
    pub items: Vec<Element>,
}

impl CardSet {
    pub fn new(id: impl Into<String>, no_items_message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ajax_loading_indicator: "large",
            ajax_loading_message: "Loading Route Information...".into(),
            no_items_message: no_items_message.into(),
            responsive_visibility: None,
            initially_hidden: None,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusList {
    pub id: String,
    pub margin_top: &'static str,
    pub list_style: &'static str,
    pub show_accessory_icons: bool,
    pub item_size: &'static str,
    pub image_style: &'static str,
    pub image_horizontal_position: &'static str,
    pub image_height: &'static str,
    pub image_width: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsive_visibility: Option<ResponsiveVisibility>,
    pub items: Vec<StatusItem>,
}

impl StatusList {
    /// The grouped small-item list used for per-stop schedules.
    pub fn grouped(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            margin_top: "none",
            list_style: "grouped",
            show_accessory_icons: false,
            item_size: "small",
            image_style: "hero",
            image_horizontal_position: "left",
            image_height: "4rem",
            image_width: "3rem",
            responsive_visibility: None,
            items: Vec::new(),
        }
    }
}

/// One row of a status list. Not an element: status lists carry their items
/// inline without `elementType` tags.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusItem {
    pub title: String,
    pub image: StatusImage,
    pub description: String,
    pub status_details: Vec<StatusDetail>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusImage {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDetail {
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub byline: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsive_visibility: Option<ResponsiveVisibility>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collapsible {
    pub id: String,
    pub title: String,
    pub initially_hidden: bool,
    pub collapsed: bool,
    pub label: String,
    pub description: String,
    pub ajax_loading_indicator: &'static str,
    pub ajax_loading_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsive_visibility: Option<ResponsiveVisibility>,
    pub content: Vec<Element>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: String,
    pub initially_hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
    pub items: Vec<Element>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Element>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub track_dirty_state_button_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons_horizontal_alignment: Option<&'static str>,
}

impl Form {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            initially_hidden: false,
            relative_path: None,
            items: Vec::new(),
            buttons: Vec::new(),
            track_dirty_state_button_names: Vec::new(),
            buttons_horizontal_alignment: None,
        }
    }
}

/// A select input. Options may be flat entries or labeled groups.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInputAssistedSelect {
    pub name: String,
    pub label: String,
    pub value: String,
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventSpec>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SelectOption {
    Entry {
        value: String,
        label: String,
    },
    Group {
        label: String,
        value: Vec<SelectOption>,
    },
}

impl SelectOption {
    pub fn entry(value: impl Into<String>, label: impl Into<String>) -> Self {
        SelectOption::Entry {
            value: value.into(),
            label: label.into(),
        }
    }

    pub fn group(label: impl Into<String>) -> Self {
        SelectOption::Group {
            label: label.into(),
            value: Vec::new(),
        }
    }

    /// Push an entry into a group; no-op on flat entries.
    pub fn push(&mut self, option: SelectOption) {
        if let SelectOption::Group { value, .. } = self {
            value.push(option);
        }
    }
}

/// A client-side event wired to a form input.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSpec {
    pub event_name: &'static str,
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<&'static str>,
    pub target_id: String,
    pub ajax_relative_path: String,
    pub propagate_args: bool,
}

impl EventSpec {
    /// An `ajaxUpdate` on change targeting the given element.
    pub fn ajax_update(target_id: impl Into<String>) -> Self {
        Self {
            event_name: "change",
            action: "ajaxUpdate",
            animation: None,
            target_id: target_id.into(),
            ajax_relative_path: String::new(),
            propagate_args: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormButton {
    pub name: String,
    pub title: String,
    pub button_type: &'static str,
    pub action_style: &'static str,
    pub min_width: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkButton {
    pub title: String,
    pub action_style: &'static str,
    pub link: Link,
    pub min_width: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiveTwoColumn {
    pub id: String,
    pub primary_side: &'static str,
    pub primary_column: Column,
    pub secondary_column: Column,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub content: Vec<Element>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elements_serialize_with_type_tag_and_camel_case() {
        let card = ContentCard {
            size: "small",
            id: "1".into(),
            label: "Next Scheduled Departure: 08:15".into(),
            title: "C1".into(),
            description: "Campus loop".into(),
            description_line_clamp: 3,
            label_line_clamp: 2,
            label_text_color: "#daa900".into(),
            title_text_color: "#002856".into(),
            url: Link::relative("./shuttles/route/1"),
        };

        let json = serde_json::to_value(Element::from(card)).unwrap();
        assert_eq!(json["elementType"], "contentCard");
        assert_eq!(json["labelTextColor"], "#daa900");
        assert_eq!(json["url"]["relativePath"], "./shuttles/route/1");
    }

    #[test]
    fn page_envelope_shape() {
        let mut page = Page::new();
        page.content.push(Divider::spacer("3%").into());

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["metadata"]["version"], "2.0");
        assert_eq!(json["contentContainerWidth"], "full");
        assert_eq!(json["content"][0]["elementType"], "divider");
        assert!(json["elementFields"].as_object().unwrap().is_empty());
    }

    #[test]
    fn unset_optionals_are_omitted() {
        let divider = Divider {
            border_style: "none",
            margin_top: None,
        };
        let json = serde_json::to_value(Element::from(divider)).unwrap();
        assert!(json.get("marginTop").is_none());

        let form = Form::new("routePlan");
        let json = serde_json::to_value(Element::from(form)).unwrap();
        assert!(json.get("buttons").is_none());
        assert!(json.get("relativePath").is_none());
    }

    #[test]
    fn grouped_select_options_nest() {
        let mut group = SelectOption::group("Popular Stops");
        group.push(SelectOption::entry("6", "Transit Center"));

        let input = FormInputAssistedSelect {
            name: "selectInitialStop".into(),
            label: "Select your nearest bus stop".into(),
            value: "none".into(),
            options: vec![SelectOption::entry("none", "Please select a bus stop"), group],
            events: vec![EventSpec::ajax_update("routeCardSet")],
        };

        let json = serde_json::to_value(Element::from(input)).unwrap();
        assert_eq!(json["options"][0]["value"], "none");
        assert_eq!(json["options"][1]["label"], "Popular Stops");
        assert_eq!(json["options"][1]["value"][0]["label"], "Transit Center");
        assert_eq!(json["events"][0]["action"], "ajaxUpdate");
    }

    #[test]
    fn responsive_visibility_presets() {
        let json = serde_json::to_value(ResponsiveVisibility::desktop_only()).unwrap();
        assert_eq!(json["xsmall"], false);
        assert_eq!(json["small"], false);
        assert!(json.get("medium").is_none());

        let json = serde_json::to_value(ResponsiveVisibility::mobile_only()).unwrap();
        assert_eq!(json["large"], false);
        assert!(json.get("xsmall").is_none());
    }
}
