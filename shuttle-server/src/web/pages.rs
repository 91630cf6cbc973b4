//! Widget page builders.
//!
//! Assemble the three CMS pages — home, route detail, and planner results —
//! from graph snapshots and planner output. All styling values (brand
//! colors, icon URLs, layout margins) live here; the core never sees them.

use serde_json::json;

use crate::domain::{DayTime, Route, ServiceDay, StopId};
use crate::planner::{plan_journey, Anchor, ArrivalCalculator, PlanError, PlannerConfig};
use crate::schedule::RouteGraph;

use super::widget::*;

const LABEL_COLOR: &str = "#daa900";
const TITLE_COLOR: &str = "#002856";
const SUBHEADING_COLOR: &str = "rgba(0,40,86,0.75)";
const HERO_OVERLAY: &str = "#EFEFEF";

const STOP_ICON_DEFAULT: &str =
    "https://static.modolabs.com/modo4/documentation/images/shuttles/shuttle_stops/default.svg";
const STOP_ICON_AT_STOP: &str =
    "https://static.modolabs.com/modo4/documentation/images/shuttles/shuttle_stops/at_stop.svg";

/// Stops surfaced at the top of the nearest-stop selector.
const POPULAR_STOP_NAMES: &[&str] = &[
    "University Transit Center",
    "Village Apartments",
    "Downtown Campus Center",
    "Mall Transfer Point",
    "Amtrak Station",
];

/// How imminent an arrival is, for the route detail status list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Imminence {
    /// Roughly at the stop now
    Approaching,
    /// Five minutes or less out
    Soon,
    /// More than an hour out
    OverAnHour,
    Plain,
}

fn classify_minutes(minutes: i64) -> Imminence {
    if minutes <= 1 {
        Imminence::Approaching
    } else if minutes <= 5 {
        Imminence::Soon
    } else if minutes > 60 {
        Imminence::OverAnHour
    } else {
        Imminence::Plain
    }
}

/// The home page: service-day toggle, nearest-stop selector, route cards.
pub fn home_page(
    graph: &RouteGraph,
    service_day: ServiceDay,
    selected_stop: Option<StopId>,
    now: DayTime,
) -> Page {
    let mut page = Page::new();

    page.content.push(service_type_toggle(service_day));
    page.content.push(nearest_stop_selector(graph));

    let no_buses = "There are currently no buses running. Check back later!";

    let mut cards = CardSet::new("routeCardSet", no_buses);
    cards.responsive_visibility = Some(ResponsiveVisibility::desktop_only());
    cards.items = route_cards(graph, selected_stop, now);
    page.content.push(cards.into());

    let mut mobile_cards = CardSet::new("routeCardSetMobile", no_buses);
    mobile_cards.responsive_visibility = Some(ResponsiveVisibility::mobile_only());
    mobile_cards.initially_hidden = Some(true);
    mobile_cards.items = route_cards(graph, selected_stop, now);
    page.content.push(mobile_cards.into());

    page
}

/// The `elementFields` payload for an ajax refresh of the route card sets.
pub fn home_cards_fields(
    graph: &RouteGraph,
    selected_stop: Option<StopId>,
    now: DayTime,
) -> serde_json::Value {
    json!({
        "initiallyHidden": false,
        "items": route_cards(graph, selected_stop, now),
    })
}

/// One card per route; with a stop selected, only routes serving it, labeled
/// with the next departure from that stop.
fn route_cards(graph: &RouteGraph, selected_stop: Option<StopId>, now: DayTime) -> Vec<Element> {
    let calc = ArrivalCalculator::new(graph);

    graph
        .routes()
        .iter()
        .filter(|route| selected_stop.is_none_or(|stop| route.serves(stop)))
        .map(|route| {
            let label = match selected_stop {
                None => "Select a stop to view next arrival time.".to_string(),
                Some(stop) => departure_label(&calc, route, stop, now),
            };
            route_card(route, label)
        })
        .collect()
}

fn route_card(route: &Route, label: String) -> Element {
    ContentCard {
        size: "small",
        id: route.id.to_string(),
        label,
        title: route.name.clone(),
        description: route.description.clone(),
        description_line_clamp: 3,
        label_line_clamp: 2,
        label_text_color: LABEL_COLOR.into(),
        title_text_color: TITLE_COLOR.into(),
        url: Link::relative(format!("./shuttles/route/{}", route.id)),
    }
    .into()
}

/// Card label for the next departure of `route` at `stop`.
///
/// "No more departures today" stays distinguishable from "nothing scheduled":
/// the former still names tomorrow's first time.
fn departure_label(
    calc: &ArrivalCalculator<'_>,
    route: &Route,
    stop: StopId,
    now: DayTime,
) -> String {
    match calc.next_arrival(route.id, stop, now) {
        Ok(arrival) if arrival.is_today() => {
            format!("Next Scheduled Departure: {}", arrival.time)
        }
        Ok(arrival) => format!(
            "No more departures today. Next bus tomorrow at {}.",
            arrival.time
        ),
        Err(_) => "No buses scheduled today.".to_string(),
    }
}

fn service_type_toggle(service_day: ServiceDay) -> Element {
    let value = match service_day {
        ServiceDay::Weekday => "weekday",
        ServiceDay::Weekend => "weekend",
    };

    let mut form = Form::new("serviceTypeSelector");
    form.items.push(
        FormInputAssistedSelect {
            name: "serviceType".into(),
            label: "Service Type".into(),
            value: value.into(),
            options: vec![
                SelectOption::entry("weekday", "Weekday Service"),
                SelectOption::entry("weekend", "Weekend Service"),
            ],
            events: vec![
                EventSpec::ajax_update("routeCardSet"),
                EventSpec::ajax_update("routeCardSetMobile"),
            ],
        }
        .into(),
    );
    form.into()
}

fn nearest_stop_selector(graph: &RouteGraph) -> Element {
    let mut popular = SelectOption::group("Popular Stops");
    let mut other = SelectOption::group("All Other Stops");

    for stop in graph.stops() {
        let entry = SelectOption::entry(stop.id.to_string(), stop.name.clone());
        let is_popular = POPULAR_STOP_NAMES
            .iter()
            .any(|name| stop.name.contains(name));
        if is_popular {
            popular.push(entry);
        } else {
            other.push(entry);
        }
    }

    let mut form = Form::new("selectInitialStop");
    form.items.push(
        FormInputAssistedSelect {
            name: "selectInitialStop".into(),
            label: "Select your nearest bus stop".into(),
            value: "none".into(),
            options: vec![
                SelectOption::entry("none", "Please select a bus stop"),
                popular,
                other,
            ],
            events: vec![
                EventSpec {
                    event_name: "change",
                    action: "toggle",
                    animation: Some("slide"),
                    target_id: "routeCardSetMobile".into(),
                    ajax_relative_path: String::new(),
                    propagate_args: true,
                },
                EventSpec::ajax_update("routeCardSet"),
                EventSpec::ajax_update("routeCardSetMobile"),
            ],
        }
        .into(),
    );
    form.into()
}

/// The route detail page: hero header plus a per-stop status list of next
/// arrivals.
pub fn route_page(graph: &RouteGraph, route: &Route, now: DayTime, updated: &str) -> Page {
    let mut page = Page::new();

    page.header.push(
        Hero::solid(
            HERO_OVERLAY,
            vec![
                breadcrumbs(
                    "status_detail_bc",
                    vec![
                        ("Shuttles Homepage", Some("./shuttles")),
                        ("Routes", Some("./shuttles")),
                        (&route.name, None),
                    ],
                ),
                HeroHeading {
                    heading: route.name.clone(),
                    responsive_scaling: true,
                    font_size: "large",
                    text_color: TITLE_COLOR.into(),
                    text_alignment: "left",
                    margin_top: Some("3%".into()),
                    margin_bottom: Some("2%".into()),
                }
                .into(),
            ],
        )
        .into(),
    );

    let items = stop_status_items(graph, route, now);

    let mut schedule_list = StatusList::grouped("scheduleList");
    schedule_list.responsive_visibility = Some(ResponsiveVisibility::desktop_only());
    schedule_list.items = items.clone();

    let mut schedule_list_mobile = StatusList::grouped("scheduleListMobile");
    schedule_list_mobile.responsive_visibility = Some(ResponsiveVisibility::mobile_only());
    schedule_list_mobile.items = items;

    let details = Detail {
        description: Some("Route Details:".into()),
        byline: format!("Last updated: {updated}"),
        body: route.description.clone(),
        responsive_visibility: Some(ResponsiveVisibility::desktop_only()),
    };

    let details_mobile = Collapsible {
        id: "full_status_collapse_mobile".into(),
        title: "View Route Details".into(),
        initially_hidden: false,
        collapsed: true,
        label: "Information:".into(),
        description: "Click a status item to view more information.".into(),
        ajax_loading_indicator: "large",
        ajax_loading_message: "Loading Status Items...".into(),
        responsive_visibility: Some(ResponsiveVisibility::mobile_only()),
        content: vec![Detail {
            description: None,
            byline: format!("Last updated: {updated}"),
            body: route.description.clone(),
            responsive_visibility: None,
        }
        .into()],
    };

    page.content.push(
        ResponsiveTwoColumn {
            id: "content".into(),
            primary_side: "right",
            primary_column: Column {
                content: vec![
                    Divider::spacer("5%").into(),
                    schedule_list.into(),
                    details_mobile.into(),
                ],
            },
            secondary_column: Column {
                content: vec![
                    Divider::spacer("15%").into(),
                    details.into(),
                    schedule_list_mobile.into(),
                ],
            },
        }
        .into(),
    );

    page
}

/// Status rows for each stop of a route, in position order.
fn stop_status_items(graph: &RouteGraph, route: &Route, now: DayTime) -> Vec<StatusItem> {
    let calc = ArrivalCalculator::new(graph);

    route
        .stops
        .iter()
        .map(|route_stop| {
            let title = graph
                .stop_name(route_stop.stop)
                .unwrap_or_default()
                .to_string();
            match calc.next_arrival(route.id, route_stop.stop, now) {
                Ok(arrival) if arrival.is_today() => {
                    let minutes = now.minutes_until(arrival.time);
                    status_item(title, arrival.time, minutes)
                }
                Ok(arrival) => StatusItem {
                    title,
                    image: StatusImage {
                        url: STOP_ICON_DEFAULT.into(),
                    },
                    description: format!(
                        "There are no more buses scheduled for today. \
                         The next bus will arrive tomorrow at {}.",
                        arrival.time
                    ),
                    status_details: vec![StatusDetail {
                        value: "N/A".into(),
                        description: "minutes away".into(),
                    }],
                },
                Err(_) => StatusItem {
                    title,
                    image: StatusImage {
                        url: STOP_ICON_DEFAULT.into(),
                    },
                    description: "No buses are scheduled for this stop today.".into(),
                    status_details: vec![StatusDetail {
                        value: "N/A".into(),
                        description: "minutes away".into(),
                    }],
                },
            }
        })
        .collect()
}

fn status_item(title: String, time: DayTime, minutes: i64) -> StatusItem {
    let (value, away, description, icon) = match classify_minutes(minutes) {
        Imminence::Approaching => (
            "Arriving".to_string(),
            "Now",
            "The bus is approaching the stop.".to_string(),
            STOP_ICON_AT_STOP,
        ),
        Imminence::Soon => (
            minutes.to_string(),
            "minutes away",
            format!("Arriving soon at {time}"),
            STOP_ICON_AT_STOP,
        ),
        Imminence::OverAnHour => (
            "> 1hr".to_string(),
            "minutes away",
            format!("The next bus will arrive at {time}"),
            STOP_ICON_DEFAULT,
        ),
        Imminence::Plain => (
            minutes.to_string(),
            "minutes away",
            format!("Arriving at {time}"),
            STOP_ICON_DEFAULT,
        ),
    };

    StatusItem {
        title,
        image: StatusImage { url: icon.into() },
        description,
        status_details: vec![StatusDetail {
            value,
            description: away.into(),
        }],
    }
}

/// The route planner results page.
pub fn plan_page(
    graph: &RouteGraph,
    config: &PlannerConfig,
    start: StopId,
    end: StopId,
    target: DayTime,
    anchor: Anchor,
) -> Result<Page, PlanError> {
    let plan = plan_journey(graph, config, start, end, target, anchor)?;

    let start_name = graph.stop_name(start).unwrap_or_default().to_string();
    let end_name = graph.stop_name(end).unwrap_or_default().to_string();

    let mut page = Page::new();

    page.header.push(
        Hero::solid(
            HERO_OVERLAY,
            vec![
                breadcrumbs(
                    "status_detail_bc",
                    vec![
                        ("Shuttles Homepage", Some("./shuttles")),
                        ("Route Planner", Some("./shuttles")),
                        (&format!("{start_name} to {end_name}"), None),
                    ],
                ),
                HeroHeading {
                    heading: "Routes Between".into(),
                    responsive_scaling: true,
                    font_size: "xsmall",
                    text_color: SUBHEADING_COLOR.into(),
                    text_alignment: "left",
                    margin_top: Some("3%".into()),
                    margin_bottom: Some("0%".into()),
                }
                .into(),
                HeroHeading {
                    heading: format!("{start_name} & {end_name}"),
                    responsive_scaling: true,
                    font_size: "large",
                    text_color: TITLE_COLOR.into(),
                    text_alignment: "left",
                    margin_top: Some("0.5%".into()),
                    margin_bottom: Some("2%".into()),
                }
                .into(),
            ],
        )
        .into(),
    );

    let mut cards = CardSet::new(
        "routeCardSet",
        "There are no buses serving this route at this time. \
         Check back at a later date. (Is it a weekend?)",
    );

    for timed in &plan.direct {
        let route_id = timed.timings[0].route;
        if let Some(route) = graph.route(route_id) {
            let label = format!(
                "Departs {} from {start_name}",
                timed.depart().time_of_day()
            );
            cards.items.push(route_card(route, label));
        }
    }

    for timed in &plan.transfer {
        cards.items.push(transfer_card(graph, timed, &end_name));
    }

    page.content.push(
        ResponsiveTwoColumn {
            id: "content".into(),
            primary_side: "right",
            primary_column: Column {
                content: vec![
                    Divider::spacer("3%").into(),
                    BlockHeading {
                        heading: "Available Routes".into(),
                        heading_level: None,
                        description: Some(
                            "All the routes that go between the two stops you selected, \
                             as well as their departure times."
                                .into(),
                        ),
                    }
                    .into(),
                    cards.into(),
                ],
            },
            secondary_column: Column {
                content: vec![
                    Divider::spacer("3%").into(),
                    BlockHeading {
                        heading: "Plan Another Route".into(),
                        heading_level: None,
                        description: Some(
                            "Select a starting and ending point to see the routes that \
                             service those stops, as well as the next departure time."
                                .into(),
                        ),
                    }
                    .into(),
                    plan_form(graph),
                ],
            },
        }
        .into(),
    );

    Ok(page)
}

/// Card for a one-transfer journey.
fn transfer_card(
    graph: &RouteGraph,
    timed: &crate::domain::TimedJourney,
    end_name: &str,
) -> Element {
    let route_names: Vec<String> = timed
        .timings
        .iter()
        .map(|timing| {
            graph
                .route(timing.route)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| timing.route.to_string())
        })
        .collect();
    let transfer_name = timed
        .journey
        .transfer_stop()
        .and_then(|stop| graph.stop_name(stop))
        .unwrap_or_default()
        .to_string();
    let first_route = timed.timings[0].route;

    ContentCard {
        size: "small",
        id: format!("transfer-{first_route}"),
        label: format!(
            "Departs {} · arrives {end_name} at {}",
            timed.depart().time_of_day(),
            timed.arrive().time_of_day()
        ),
        title: route_names.join(" to "),
        description: format!("Transfer at {transfer_name}"),
        description_line_clamp: 3,
        label_line_clamp: 2,
        label_text_color: LABEL_COLOR.into(),
        title_text_color: TITLE_COLOR.into(),
        url: Link::relative(format!("./shuttles/route/{first_route}")),
    }
    .into()
}

/// The start/end selection form shown beside planner results.
fn plan_form(graph: &RouteGraph) -> Element {
    let options: Vec<SelectOption> = graph
        .stops()
        .iter()
        .map(|stop| SelectOption::entry(stop.id.to_string(), stop.name.clone()))
        .collect();

    let mut form = Form::new("routePlan");
    form.relative_path = Some("./shuttles/routeplanner".into());
    form.items.push(
        FormInputAssistedSelect {
            name: "startpoint".into(),
            label: "Select Starting Point".into(),
            value: String::new(),
            options: options.clone(),
            events: vec![],
        }
        .into(),
    );
    form.items.push(
        FormInputAssistedSelect {
            name: "endpoint".into(),
            label: "Select Destination".into(),
            value: String::new(),
            options,
            events: vec![],
        }
        .into(),
    );
    form.buttons.push(
        FormButton {
            name: "s1_submit".into(),
            title: "Submit".into(),
            button_type: "submit",
            action_style: "constructive",
            min_width: "9rem",
        }
        .into(),
    );
    form.buttons.push(
        LinkButton {
            title: "Return Home".into(),
            action_style: "normal",
            link: Link::relative("./shuttles"),
            min_width: "9rem",
        }
        .into(),
    );
    form.track_dirty_state_button_names = vec!["s1_submit".into()];
    form.buttons_horizontal_alignment = Some("center");
    form.into()
}

fn breadcrumbs(id: &str, items: Vec<(&str, Option<&str>)>) -> Element {
    HeroBreadcrumbs {
        id: id.into(),
        separator_character: "/",
        ellipsize: true,
        separator_color: LABEL_COLOR.into(),
        items: items
            .into_iter()
            .map(|(title, url)| {
                BreadcrumbItem {
                    title: title.into(),
                    url: url.map(Link::relative),
                }
                .into()
            })
            .collect(),
    }
    .into()
}
