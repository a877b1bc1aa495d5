//! Controller and motor driver talking over an in-memory bus.
//!
//! ```text
//! cargo run -p gn10can --example motor-loopback
//! ```

use std::rc::Rc;

use gn10can::bus::Bus;
use gn10can::devices::{EncoderType, GainType, MotorConfig, MotorDriverClient, MotorDriverServer};
use gn10can::transceiver::VirtualWire;

fn main() {
    let wire = VirtualWire::new();
    let controller = Rc::new(Bus::new(wire.connect()));
    let driver = Rc::new(Bus::new(wire.connect()));

    let client = MotorDriverClient::new(controller.clone(), 1);
    let server = MotorDriverServer::new(driver.clone(), 1);
    if let Some(err) = client.attach_error().or(server.attach_error()) {
        eprintln!("attach failed: {err}");
        return;
    }

    let config = MotorConfig::default()
        .with_max_duty_ratio(0.6)
        .with_feedback_cycle_ms(10)
        .with_encoder_type(EncoderType::IncrementalSpeed);

    let sent = {
        let client = client.borrow();
        client.set_init(&config) && client.set_gain(GainType::Kp, 0.8) && client.set_target(120.0)
    };
    if !sent {
        eprintln!("controller commands were not accepted by the wire");
        return;
    }
    let summary = driver.poll();
    println!(
        "driver: received={} dispatched={}",
        summary.received, summary.dispatched
    );

    let mut position = 0.0f32;
    for step in 0..5 {
        let target = server.borrow_mut().take_target();
        if let Some(target) = target {
            println!("driver: new target {target}");
            position = target * 0.9;
        }
        let reported = {
            let server = server.borrow();
            server.send_feedback(position + f32::from(step), 0)
                && server.send_hardware_status(0.4 + 0.1 * f32::from(step), 30 + step)
        };
        if !reported {
            eprintln!("driver telemetry was not accepted by the wire");
            return;
        }
        controller.poll();

        let client = client.borrow();
        println!(
            "controller: feedback={:.1} current={:.2}A temperature={}C",
            client.feedback_value(),
            client.load_current(),
            client.temperature()
        );
    }

    let init = server.borrow_mut().take_init();
    if let Some(config) = init {
        println!(
            "driver: duty limit {:.0}% encoder {:?}",
            config.max_duty_ratio() * 100.0,
            config.encoder_type
        );
    }
}
