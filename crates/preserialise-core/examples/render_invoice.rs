// Render a small invoice graph to JSON at two levels of detail
// Usage: cargo run --example render_invoice

use std::rc::Rc;

use preserialise_core::{args, Args, Fields, Map, Preserialisable, Preserialiser, Result, Value};

struct Customer {
    name: String,
    country: String,
}

impl Fields for Customer {
    fn fields(&self) -> Map {
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::from(self.name.as_str()));
        fields.insert("country".to_string(), Value::from(self.country.as_str()));
        fields
    }
}

struct LineItem {
    sku: &'static str,
    quantity: u32,
    unit_price: f64,
}

impl Preserialisable for LineItem {
    fn preserialise(&self, args: &Args) -> Result<Value> {
        let mut data = Map::new();
        data.insert("sku".to_string(), Value::from(self.sku));
        data.insert("quantity".to_string(), Value::from(self.quantity));
        if args.get("include_prices").and_then(|flag| flag.as_bool()).unwrap_or(false) {
            data.insert("unit_price".to_string(), Value::from(self.unit_price));
            data.insert(
                "total".to_string(),
                Value::from(self.unit_price * f64::from(self.quantity)),
            );
        }
        Ok(Value::Map(data))
    }
}

struct Invoice {
    number: u64,
    customer: Rc<Customer>,
    items: Vec<Rc<LineItem>>,
}

impl Preserialisable for Invoice {
    fn preserialise(&self, args: &Args) -> Result<Value> {
        let mut data = Map::new();
        data.insert("number".to_string(), Value::from(self.number));
        data.insert("customer".to_string(), Value::plain(self.customer.clone()));
        if args.get("include_items").and_then(|flag| flag.as_bool()).unwrap_or(false) {
            let items: Vec<Value> = self
                .items
                .iter()
                .cloned()
                .map(|item| Value::preserialisable(item))
                .collect();
            data.insert("items".to_string(), Value::Seq(items));
        }
        Ok(Value::Map(data))
    }
}

fn main() -> Result<()> {
    let invoice = Rc::new(Invoice {
        number: 20_250_001,
        customer: Rc::new(Customer {
            name: "Blackwater Park Ltd".to_string(),
            country: "SE".to_string(),
        }),
        items: vec![
            Rc::new(LineItem { sku: "OPE-001", quantity: 2, unit_price: 19.5 }),
            Rc::new(LineItem { sku: "OPE-014", quantity: 1, unit_price: 42.0 }),
        ],
    });

    let engine = Preserialiser::new().with_default_args(args! { "include_items" => true });

    // Summary view: engine defaults only
    let summary = engine.preserialise(Value::preserialisable(invoice.clone()))?;
    println!("summary:\n{}", serde_json::to_string_pretty(&summary).expect("valid tree"));

    // Detailed view: the per-call arg reaches every line item
    let detailed = engine.preserialise_with(
        Value::preserialisable(invoice),
        args! { "include_prices" => true },
    )?;
    println!("detailed:\n{}", serde_json::to_string_pretty(&detailed).expect("valid tree"));

    Ok(())
}
