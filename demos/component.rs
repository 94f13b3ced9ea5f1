use safeline::prelude::*;
use simple_logger::SimpleLogger;
use std::{cell::RefCell, rc::Rc};

/// A component which binds its subscriptions to its own lifetime.
/// When the host destroys it, every binding stops, and nothing leaks into the shared streams.
pub fn main() -> anyhow::Result<()> {
    SimpleLogger::new().init().expect("log init failed");

    // streams are usually shared across the application, and outlive the components which listen to them
    let prices: Subject<u32> = Subject::new();
    let refresh: Subject<()> = Subject::new();

    let widget = PriceWidget::new();
    widget.bind(&prices, &refresh)?;

    prices.next(100);
    prices.next(105);
    println!("widget shows {:?}", widget.shown());

    // a stop token ends the 'until' binding, but leaves the owner's bindings alone
    refresh.next(());
    prices.next(110);
    println!("after refresh, widget shows {:?}", widget.shown());

    // the host tears the component down.  the shared stream keeps running for everyone else
    widget.destroy();
    prices.next(120);
    println!("after destroy, widget shows {:?}", widget.shown());
    println!("prices has {} subscribers", prices.subscriber_count());

    Ok(())
}

struct PriceWidget {
    lifecycle: LifecycleOwner,
    shown: Rc<RefCell<Vec<String>>>,
}

impl PriceWidget {
    pub fn new() -> Self {
        Self {
            lifecycle: LifecycleOwner::with_post_destroy(|| println!("widget released"))
                .named("PriceWidget"),
            shown: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn bind(&self, prices: &Subject<u32>, refresh: &Subject<()>) -> anyhow::Result<()> {
        let shown = self.shown.clone();
        prices
            .clone()
            .map(|cents: u32| format!("${}.{:02}", cents / 100, cents % 100))
            .subscribe_safely(self, move |label: String| shown.borrow_mut().push(label))?;

        // the 'until' binding is gated on an external token, and never enters the registry
        let shown = self.shown.clone();
        prices.subscribe_until(refresh, move |cents: u32| {
            if cents > 100 {
                shown.borrow_mut().push("up".to_string());
            }
        })?;

        Ok(())
    }

    pub fn shown(&self) -> Vec<String> {
        self.shown.borrow().clone()
    }
}

impl Lifecycle for PriceWidget {
    fn lifecycle(&self) -> Option<&LifecycleOwner> {
        Some(&self.lifecycle)
    }

    fn destroy(&self) {
        // overrides must chain to the base, or the bindings above stay live
        destroy_base(self);
        self.shown.borrow_mut().clear();
    }

    fn on_destroy(&self) {
        println!("widget hook ran");
    }
}
