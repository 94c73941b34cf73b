// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Companion car firmware.

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_halt as _;

use hal::{
    pac::{self, interrupt},
    prelude::*,
    serial::{self, Serial},
};
use stm32f7xx_hal as hal;

use v2v_overtake::{
    control::Companion,
    drivers::{Hcsr04, L298n},
    hw::{usart, BoardPins, SysTickDelay, Tim2Pwm, Usart},
    log_error, log_info,
    motors::MotorActuator,
    protocol::CommandMailbox,
    sensors::SensorArray,
    Config,
};

static MAILBOX: CommandMailbox = CommandMailbox::new();

#[entry]
fn main() -> ! {
    let cfg = Config::default();

    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.sysclk(16.MHz()).freeze();
    let delay = SysTickDelay::new(cp.SYST, clocks.sysclk().raw());

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC);

    // SAFETY: RCC is already frozen; only the TIM2 enable bit is touched.
    let rcc_regs = unsafe { &*pac::RCC::ptr() };
    let (ena, enb) = Tim2Pwm::new(dp.TIM2, rcc_regs, &cfg.drive).split();
    let _pwm_pins = (pins.bridge.ena, pins.bridge.enb);

    let bridge = L298n::new(
        pins.bridge.in1,
        pins.bridge.in2,
        pins.bridge.in3,
        pins.bridge.in4,
        ena,
        enb,
    );
    let mut motors = MotorActuator::new(bridge, cfg.drive.initial_speed);
    motors.init().unwrap();
    motors.start().unwrap();

    let (ft, fe) = pins.sonar.forward;
    let (lt, le) = pins.sonar.left;
    let (rt, re) = pins.sonar.right;
    let (bt, be) = pins.sonar.backward;
    let sensors = SensorArray::new(
        Hcsr04::new(ft, fe),
        Hcsr04::new(lt, le),
        Hcsr04::new(rt, re),
        Hcsr04::new(bt, be),
        cfg.sensor,
    );

    // USART1 (telemetry co-processor)
    let telemetry = Serial::new(
        dp.USART1,
        (pins.usart1.tx, pins.usart1.rx),
        &clocks,
        serial_config(),
    );

    // USART6 (Bluetooth remote)
    let mut remote = Serial::new(
        dp.USART6,
        (pins.usart6.tx, pins.usart6.rx),
        &clocks,
        serial_config(),
    );
    remote.listen(serial::Event::Rxne);
    unsafe { cortex_m::peripheral::NVIC::unmask(pac::Interrupt::USART6) };

    let mut companion = Companion::new(
        motors,
        sensors,
        Usart::new(telemetry),
        delay,
        &MAILBOX,
        cfg.companion,
    );
    log_info!("companion: ready");

    loop {
        if let Err(e) = companion.step() {
            log_error!("companion: {:?}", e);
        }
    }
}

/// 9600 8N1, shared by both ports.
fn serial_config() -> serial::Config {
    serial::Config {
        baud_rate: 9_600.bps(),
        ..Default::default()
    }
}

#[interrupt]
fn USART6() {
    if let Some(byte) = usart::take_rx_byte() {
        MAILBOX.post(byte);
    }
}
