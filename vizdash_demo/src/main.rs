// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Example binary for `vizdash_widgets`.
//!
//! Run with `RUST_LOG=debug` to see skipped directives and stale-load handling.

use vizdash_query::{Record, RecordCollection, Schema};
use vizdash_widgets::{
    Dashboard, MemorySource, WidgetId, WidgetKind, WidgetResult, WidgetSpec, load_widget,
};

fn main() {
    env_logger::init();

    let source = MemorySource::new()
        .with("Orders", orders())
        .with("Targets", targets());

    for entity in ["Orders", "Targets"] {
        if let Some(schema) = source.schema(entity) {
            print_schema(entity, &schema);
        }
    }

    let mut dashboard = Dashboard::new();
    dashboard.upsert(
        WidgetId(1),
        WidgetSpec::new("Orders")
            .with_query("$filter=Freight gt 10&$select=ShipCountry,Freight")
            .with_group_key("ShipCountry")
            .with_value_key("Freight"),
    );
    dashboard.upsert(
        WidgetId(2),
        WidgetSpec::new("Orders")
            .with_query("Orders?$orderby=Freight desc")
            .with_group_key("ShipCity")
            .with_value_key("Freight")
            .with_limit(3),
    );
    dashboard.upsert(
        WidgetId(3),
        WidgetSpec::new("Orders")
            .with_group_key("ShipCountry")
            .with_value_key("Freight")
            .with_filter("fr"),
    );
    dashboard.upsert(
        WidgetId(4),
        WidgetSpec::new("Orders")
            .with_value_key("Freight")
            .with_kind(WidgetKind::Kpi),
    );
    dashboard.upsert(
        WidgetId(5),
        WidgetSpec::new("Targets")
            .with_group_key("month")
            .with_value_key("revenue"),
    );
    // A compound filter is unsupported and matches every row.
    dashboard.upsert(
        WidgetId(6),
        WidgetSpec::new("Orders")
            .with_query("$filter=Freight gt 10 and ShipCountry eq 'France'&$top=ten")
            .with_group_key("ShipCountry")
            .with_value_key("Freight"),
    );
    dashboard.upsert(WidgetId(7), WidgetSpec::new("Customers"));

    dashboard.refresh_all(&source);

    for id in dashboard.ids() {
        let Some(widget) = dashboard.widget(id) else {
            continue;
        };
        println!("widget {} ({})", id.0, widget.spec.query_string());
        match (&widget.result, &widget.error) {
            (Some(result), _) => print_result(widget.spec.kind, result),
            (None, Some(err)) => println!("  no data: {err}"),
            (None, None) => println!("  not loaded"),
        }
    }

    // A load that finishes after its widget changed is dropped.
    let id = WidgetId(1);
    let Ok(ticket) = dashboard.begin_load(id) else {
        return;
    };
    dashboard.upsert(
        id,
        WidgetSpec::new("Orders")
            .with_group_key("ShipCity")
            .with_value_key("Freight"),
    );
    let outcome = load_widget(&source, ticket.spec());
    let applied = dashboard.finish_load(ticket, outcome);
    println!("stale load applied: {applied}");
}

fn print_schema(entity: &str, schema: &Schema) {
    println!("{entity}:");
    for field in &schema.fields {
        println!("  {} {:?}", field.name, field.field_type);
    }
}

fn print_result(kind: WidgetKind, result: &WidgetResult) {
    match kind {
        WidgetKind::Kpi => println!("  {} = {:.2}", result.value_key, result.kpi()),
        WidgetKind::Chart => {
            for (label, value) in result.points() {
                println!("  {label:<16} {value:>10.2}");
            }
            println!(
                "  grouped={} total={:.2} average={:.2}",
                result.grouped, result.total, result.average
            );
        }
    }
}

fn orders() -> RecordCollection {
    [
        (10248, "Reims", "France", 32.38, "1996-07-04"),
        (10249, "Münster", "Germany", 11.61, "1996-07-05"),
        (10250, "Rio de Janeiro", "Brazil", 65.83, "1996-07-08"),
        (10251, "Lyon", "France", 41.34, "1996-07-08"),
        (10252, "Charleroi", "Belgium", 51.30, "1996-07-09"),
        (10253, "Rio de Janeiro", "Brazil", 58.17, "1996-07-10"),
        (10254, "Bern", "Switzerland", 22.98, "1996-07-11"),
        (10255, "Genève", "Switzerland", 148.33, "1996-07-12"),
        (10256, "Resende", "Brazil", 13.97, "1996-07-15"),
        (10257, "San Cristóbal", "Venezuela", 81.91, "1996-07-16"),
    ]
    .into_iter()
    .map(|(id, city, country, freight, date)| {
        Record::new()
            .with("OrderID", id)
            .with("ShipCity", city)
            .with("ShipCountry", country)
            .with("Freight", freight)
            .with("OrderDate", date)
    })
    .collect()
}

fn targets() -> RecordCollection {
    [
        ("Jan", 120.0, 100.0),
        ("Feb", 90.0, 110.0),
        ("Jan", 15.0, 0.0),
        ("Mar", 140.0, 120.0),
    ]
    .into_iter()
    .map(|(month, actual, target)| {
        Record::new()
            .with("month", month)
            .with("actual", actual)
            .with("target", target)
    })
    .collect()
}
