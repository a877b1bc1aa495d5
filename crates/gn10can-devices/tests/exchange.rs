use std::rc::Rc;

use gn10can_bus::Bus;
use gn10can_devices::{
    EncoderType, GainType, MotorConfig, MotorDriverClient, MotorDriverServer, ServoDriverClient,
    SolenoidDriverClient, SolenoidDriverServer,
};
use gn10can_frame::{Frame, MotorDriverCommand, ServoDriverCommand};
use gn10can_transceiver::{Transceiver, VirtualTransceiver, VirtualWire};

struct Rig {
    wire: VirtualWire,
    controller: Rc<Bus<VirtualTransceiver>>,
    driver: Rc<Bus<VirtualTransceiver>>,
}

fn rig() -> Rig {
    let wire = VirtualWire::new();
    Rig {
        controller: Rc::new(Bus::new(wire.connect())),
        driver: Rc::new(Bus::new(wire.connect())),
        wire,
    }
}

#[test]
fn motor_commands_reach_the_driver() {
    let rig = rig();
    let client = MotorDriverClient::new(rig.controller.clone(), 1);
    let server = MotorDriverServer::new(rig.driver.clone(), 1);

    let config = MotorConfig::default()
        .with_max_duty_ratio(0.8)
        .with_feedback_cycle_ms(10)
        .with_encoder_type(EncoderType::IncrementalTotal)
        .with_forward_limit(true, 1);

    {
        let client = client.borrow();
        assert!(client.set_init(&config));
        assert!(client.set_target(123.45));
        assert!(client.set_gain(GainType::Kp, 1.5));
        assert!(client.set_gain(GainType::Kd, 0.02));
    }
    assert_eq!(rig.driver.poll().dispatched, 4);

    let mut server = server.borrow_mut();
    assert_eq!(server.take_init(), Some(config));
    assert_eq!(server.take_init(), None);
    assert_eq!(server.take_target(), Some(123.45));
    assert_eq!(server.take_gain(GainType::Kp), Some(1.5));
    assert_eq!(server.take_gain(GainType::Ki), None);
    assert_eq!(server.take_gain(GainType::Kd), Some(0.02));
}

#[test]
fn motor_telemetry_reaches_the_client() {
    let rig = rig();
    let client = MotorDriverClient::new(rig.controller.clone(), 3);
    let server = MotorDriverServer::new(rig.driver.clone(), 3);

    assert!(server.borrow().send_feedback(-42.5, 0b10));
    assert!(server.borrow().send_hardware_status(1.25, -7));
    rig.controller.poll();

    let client = client.borrow();
    assert_eq!(client.feedback_value(), -42.5);
    assert_eq!(client.limit_switches(), 0b10);
    assert_eq!(client.load_current(), 1.25);
    assert_eq!(client.temperature(), -7);
}

#[test]
fn motor_frames_use_documented_layout() {
    let wire = VirtualWire::new();
    let controller = Rc::new(Bus::new(wire.connect()));
    let mut sniffer = wire.connect();
    let client = MotorDriverClient::new(controller.clone(), 1);

    client.borrow().set_target(123.45);
    client.borrow().set_gain(GainType::Ff, 2.0);

    let target = sniffer.receive().unwrap();
    assert_eq!(target.id, 0x89);
    assert_eq!(target.dlc, 4);
    assert_eq!(target.data(), &123.45f32.to_le_bytes());

    let gain = sniffer.receive().unwrap();
    assert_eq!(gain.id, 0x8B);
    assert_eq!(gain.dlc, 5);
    assert_eq!(gain.data()[0], 3);
    assert_eq!(gain.read::<f32>(1).unwrap(), 2.0);
}

#[test]
fn telemetry_for_another_motor_is_not_seen() {
    let rig = rig();
    let client = MotorDriverClient::new(rig.controller.clone(), 1);
    let other = MotorDriverServer::new(rig.driver.clone(), 2);

    other.borrow().send_feedback(9.0, 1);
    let summary = rig.controller.poll();
    assert_eq!(summary.unrouted, 1);
    assert_eq!(client.borrow().feedback_value(), 0.0);
}

#[test]
fn short_feedback_keeps_previous_limit_switches() {
    let rig = rig();
    let client = MotorDriverClient::new(rig.controller.clone(), 0);
    let mut injector = rig.wire.connect();

    let mut full = Frame::make_command(0, MotorDriverCommand::Feedback, &[]);
    full.write(0, 1.0f32).unwrap();
    full.write(4, 0x0Fu8).unwrap();
    injector.send(&full);

    let mut short = Frame::make_command(0, MotorDriverCommand::Feedback, &[]);
    short.write(0, 2.0f32).unwrap();
    injector.send(&short);

    rig.controller.poll();
    let client = client.borrow();
    assert_eq!(client.feedback_value(), 2.0);
    assert_eq!(client.limit_switches(), 0x0F);
}

#[test]
fn solenoid_exchange() {
    let rig = rig();
    let client = SolenoidDriverClient::new(rig.controller.clone(), 0);
    let server = SolenoidDriverServer::new(rig.driver.clone(), 0);

    let mut states = [false; 8];
    states[1] = true;
    states[6] = true;
    {
        let client = client.borrow();
        assert!(client.set_init());
        assert!(client.set_target_states(states));
    }
    rig.driver.poll();

    {
        let mut state = server.borrow_mut();
        assert_eq!(state.take_init(), Some(0));
        assert_eq!(state.take_init(), None);
        assert_eq!(state.take_target_states(), Some(states));
        assert_eq!(state.take_target(), None);
    }

    client.borrow().set_target(0xFF);
    rig.driver.poll();
    assert_eq!(server.borrow_mut().take_target_states(), Some([true; 8]));
}

#[test]
fn servo_client_sends_angle_and_frequency() {
    let wire = VirtualWire::new();
    let controller = Rc::new(Bus::new(wire.connect()));
    let mut board = wire.connect();
    let servo = ServoDriverClient::new(controller.clone(), 2);

    assert!(servo.borrow().set_angle(90.0));
    assert!(servo.borrow().set_frequency(50.0));

    let angle = board.receive().unwrap();
    assert!(angle.id_fields().is_command(ServoDriverCommand::Target));
    assert_eq!(angle.read::<f32>(0).unwrap(), 90.0);
    let freq = board.receive().unwrap();
    assert!(freq.id_fields().is_command(ServoDriverCommand::Frequency));
    assert_eq!(freq.id, 0x112);

    let mut report = Frame::make_command(2, ServoDriverCommand::Target, &[]);
    report.write(0, 87.5f32).unwrap();
    board.send(&report);
    controller.poll();
    assert_eq!(servo.borrow().current_angle(), 87.5);
}

#[test]
fn offline_wire_fails_device_sends() {
    let rig = rig();
    let client = MotorDriverClient::new(rig.controller.clone(), 1);
    rig.wire.set_online(false);
    assert!(!client.borrow().set_target(1.0));
    assert!(!client.borrow().set_init(&MotorConfig::default()));
}
