#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_nrf::interrupt;
use embassy_time::Timer;
use embassy_ws2812_dma::nrf::{self, Pwm0Dma};
use embassy_ws2812_dma::{Config, Error, TransferSignal, Ws2812Dma, buffer_len, ws2812_buffer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

const NUM_LEDS: usize = 64;
const BUFFER_SIZE: usize = buffer_len(NUM_LEDS);
static LED_BUFFER: StaticCell<[u16; BUFFER_SIZE]> = StaticCell::new();
static STRIP_DONE: TransferSignal = TransferSignal::new(nrf::PWM0_ID);

#[interrupt]
fn PWM0() {
    nrf::on_interrupt(&STRIP_DONE);
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());

    let buf = LED_BUFFER.init(ws2812_buffer!(NUM_LEDS));
    let mut config = Config::default();
    config.timing = nrf::TIMING;
    let pwm = Pwm0Dma::new(p.PWM0, p.P0_13);
    let mut ws: Ws2812Dma<_, NUM_LEDS, BUFFER_SIZE> = Ws2812Dma::new(pwm, &STRIP_DONE, buf, config);

    ws.initialize().await.unwrap();

    let mut lit = 0;
    loop {
        ws.clear();
        for i in 0..=lit {
            ws.set_pixel(i, 0, 0, 20);
        }

        match ws.show().await {
            Ok(()) => {}
            Err(Error::TransferTimeout) => defmt::warn!("strip stalled, retrying"),
            Err(e) => defmt::panic!("strip error: {}", e),
        }

        lit = (lit + 1) % NUM_LEDS;
        Timer::after_millis(100).await
    }
}
