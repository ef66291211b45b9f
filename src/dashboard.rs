//! ==============================================================================
//! dashboard.rs - static light sensor dashboard page
//! ==============================================================================
//!
//! the page is fixed markup; all the work happens in the browser:
//!     1. fetch /light-sensor/data
//!     2. running average, min/max/mean and energy (same formulas as stats.rs)
//!     3. show the figures with toFixed(2) and draw a chart.js line chart,
//!        raw values solid and running average dashed
//!
//! ==============================================================================

use axum::response::Html;

pub const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Light Sensor Data</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
</head>
<body>
    <h1>Light Sensor Dashboard</h1>
    <div id="stats">
        <p><strong>Min Light Intensity:</strong> <span id="minValue"></span></p>
        <p><strong>Max Light Intensity:</strong> <span id="maxValue"></span></p>
        <p><strong>Average Light Intensity:</strong> <span id="avgValue"></span></p>
        <p><strong>Energy Usage (Wh):</strong> <span id="energyUsage"></span></p>
    </div>
    <canvas id="lightChart" width="800" height="400"></canvas>
    <script>
        const SAMPLE_INTERVAL_SECS = 10;

        fetch('/light-sensor/data')
            .then(response => response.json())
            .then(data => {
                const timestamps = data.map(d => d.timestamp);
                const lightValues = data.map(d => d.light_value);

                const runningAvg = [];
                lightValues.reduce((sum, val, index) => {
                    runningAvg[index] = (sum + val) / (index + 1);
                    return sum + val;
                }, 0);

                const minValue = Math.min(...lightValues);
                const maxValue = Math.max(...lightValues);
                const avgValue = lightValues.reduce((a, b) => a + b, 0) / lightValues.length;
                const totalEnergy = lightValues.reduce(
                    (sum, val) => sum + val * (SAMPLE_INTERVAL_SECS / 3600), 0);

                document.getElementById('minValue').textContent = minValue.toFixed(2);
                document.getElementById('maxValue').textContent = maxValue.toFixed(2);
                document.getElementById('avgValue').textContent = avgValue.toFixed(2);
                document.getElementById('energyUsage').textContent = totalEnergy.toFixed(2);

                const ctx = document.getElementById('lightChart').getContext('2d');
                new Chart(ctx, {
                    type: 'line',
                    data: {
                        labels: timestamps,
                        datasets: [
                            {
                                label: 'Light Intensity',
                                data: lightValues,
                                borderColor: 'rgba(75, 192, 192, 1)',
                                borderWidth: 2,
                                fill: false
                            },
                            {
                                label: 'Running Average',
                                data: runningAvg,
                                borderColor: 'rgba(255, 99, 132, 1)',
                                borderWidth: 2,
                                borderDash: [5, 5],
                                fill: false
                            }
                        ]
                    },
                    options: {
                        responsive: true,
                        scales: {
                            x: { title: { display: true, text: 'Time' } },
                            y: { title: { display: true, text: 'Light Intensity' } }
                        }
                    }
                });
            });
    </script>
</body>
</html>
"#;

/// GET / - serve the dashboard
pub async fn dashboard_handler() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}
