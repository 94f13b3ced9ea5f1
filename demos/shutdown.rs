use safeline::{assert_completes, prelude::*};
use simple_logger::SimpleLogger;
use std::time::Duration;
use tokio::time::sleep;

/// This example shows how to cancel async work when its owner is destroyed.
/// For the basic binding concepts, see the 'component' example.
#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    SimpleLogger::new().init().expect("log init failed");

    let owner = LifecycleOwner::new().named("Poller");

    // a guarded future runs until it finishes, or until the owner is destroyed
    let poll = owner.guard("poll", async {
        let mut polls = 0u32;
        while polls < 1000 {
            sleep(Duration::from_millis(5)).await;
            polls += 1;
            println!("poll #{}", polls);
        }

        polls
    });

    // any listener can await the teardown signal directly
    let cancelled = owner.signal().cancelled();

    let destroy = async {
        sleep(Duration::from_millis(30)).await;
        owner.destroy();
    };

    // everything stays on this thread: the poller is cancelled as soon as destroy runs
    let (result, _) = tokio::join!(poll, destroy);
    assert_eq!(None, result);

    assert_completes!(cancelled);
    println!("All done.");

    Ok(())
}
