//! Listener Example
//!
//! This example binds a feed of orders, watching elements as they complete.
//!
//! Listeners fire in document order, before the value is assigned to its parent.
//! Returning `Flow::Stop` ends the parse early; everything read so far is still returned.
use xmlbind::{Bind, BindError, BindResult, FieldType, Flow, Parser, Registry, TypeBinding, Value};

const DOCUMENT: &str = r#"<?xml version="1.0"?>
<Feed source="warehouse-4">
    <orders>
        <Order id="1001"><total>19.99</total><rush>false</rush></Order>
        <Order id="1002"><total>5.00</total><rush>true</rush></Order>
        <Order id="1003"><total>42.50</total><rush>false</rush></Order>
    </orders>
</Feed>"#;

#[derive(Debug, Default)]
struct Feed {
    source: String,
    orders: Vec<Order>,
}
impl Bind for Feed {
    fn binding() -> TypeBinding {
        TypeBinding::new::<Self>("Feed")
            .field("source", FieldType::Text)
            .field("orders", FieldType::list("Order"))
    }

    fn set(&mut self, field: &str, value: Value) -> BindResult<()> {
        match field {
            "source" => self.source = value.into_text()?,
            "orders" => self.orders = value.into_list()?,
            _ => return Err(BindError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Order {
    id: i64,
    total: f64,
    rush: bool,
}
impl Bind for Order {
    fn binding() -> TypeBinding {
        TypeBinding::new::<Self>("Order")
            .field("id", FieldType::Long)
            .field("total", FieldType::Double)
            .field("rush", FieldType::Bool)
    }

    fn set(&mut self, field: &str, value: Value) -> BindResult<()> {
        match field {
            "id" => self.id = value.into_i64()?,
            "total" => self.total = value.into_f64()?,
            "rush" => self.rush = value.into_bool()?,
            _ => return Err(BindError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

fn main() {
    let registry = Registry::new().with::<Feed>().with::<Order>();
    let mut parser = match Parser::<Feed>::new(&registry) {
        Ok(parser) => parser,
        Err(e) => panic!("Error creating parser:\n{e}"),
    };

    // Stop at the first rush order; it is still assigned to the feed
    parser.register("Order", |_, value| {
        let Some(order) = value.as_object::<Order>() else {
            return Flow::Continue;
        };

        println!("Order {} completed, total {:.2}", order.id, order.total);
        if order.rush {
            println!("Rush order found, stopping");
            Flow::Stop
        } else {
            Flow::Continue
        }
    });

    let feed = match parser.parse_str(DOCUMENT) {
        Ok(feed) => feed,
        Err(e) => panic!("Error parsing feed:\n{e}"),
    };

    println!("Read {} orders from {}", feed.orders.len(), feed.source);
}
