use electrical::battery::{Battery, BatteryParams};
use electrical::charger::Charger;
use std::fs::File;
use std::io::Write;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Small pack so the run crosses a few cycle boundaries
    let mut batt = Battery::new(BatteryParams {
        capacity_ah: Some(2.0),
        ..Default::default()
    })?;
    let mut charger = Charger::new();

    // Sim settings
    let dt = 1e-2;
    let t_end = 600.0;
    let ambient = 25.0;
    let spike_interval = 30.0;
    let spike_duration = 10.0;
    let mut spike_counter: f64 = spike_interval + spike_duration;
    let speed_nominal = 15.0; // m/s cruise
    let speed_spike = 60.0; // m/s sprint
    let mut speed = speed_nominal;

    let mut csv = File::create("battery_step.csv")?;
    writeln!(csv, "t,soc,current,temperature,soh,charging")?;

    let mut t = 0.0;
    while t <= t_end {
        // Ease the load toward the spike or cruise target
        speed = if spike_counter <= spike_duration {
            speed + (speed_spike - speed) * 0.05
        } else {
            speed + (speed_nominal - speed) * 0.05
        };
        spike_counter -= dt;
        if spike_counter <= 0.0 {
            spike_counter = spike_interval + spike_duration;
        }

        if batt.soc() < 20.0 || charger.is_charging() {
            charger.start_charging(&mut batt, dt);
        } else {
            batt.discharge(speed, dt);
        }
        let moved = batt.take_throughput();
        batt.degrade_with_cycle(moved);
        batt.update_temperature(dt, ambient);
        batt.degrade_soh(dt);

        writeln!(
            csv,
            "{:.6},{:.6},{:.6},{:.6},{:.6},{}",
            t,
            batt.soc(),
            batt.current(),
            batt.temperature(),
            batt.state_of_health(),
            charger.is_charging()
        )?;

        t += dt;
    }

    println!("Wrote battery_step.csv");
    Ok(())
}
