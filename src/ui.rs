use crate::models::{DailyStats, TimerSnapshot};
use crate::timer::ALLOWED_DURATIONS;

pub fn render_index(date: &str, timer: &TimerSnapshot, stats: &DailyStats) -> String {
    let options: String = ALLOWED_DURATIONS
        .iter()
        .map(|minutes| {
            let selected = if *minutes == timer.duration_minutes { " selected" } else { "" };
            format!(r#"<option value="{minutes}"{selected}>{minutes} minutes</option>"#)
        })
        .collect();

    INDEX_HTML
        .replace("{{DATE}}", date)
        .replace("{{DISPLAY}}", &timer.display)
        .replace("{{PROGRESS}}", &format!("{:.2}", timer.progress_percent))
        .replace("{{DURATION_OPTIONS}}", &options)
        .replace("{{SESSIONS}}", &stats.sessions.to_string())
        .replace("{{FOCUS}}", &stats.focus_time.to_string())
        .replace("{{XP}}", &stats.xp.to_string())
        // User text goes in last so placeholders typed into it stay literal.
        .replace("{{SKILL}}", &escape_html(timer.skill_id.as_deref().unwrap_or("")))
        .replace("{{NOTES}}", &escape_html(&timer.notes))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Focus Timer</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #2b2a28;
      --accent: #d9534f;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px;
    }

    .app {
      width: min(640px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    #timer-display {
      font-size: 4.5rem;
      font-variant-numeric: tabular-nums;
      text-align: center;
      letter-spacing: 0.04em;
    }

    .progress {
      height: 10px;
      border-radius: 999px;
      background: #e6e0d6;
      overflow: hidden;
    }

    #progress-bar {
      height: 100%;
      background: var(--accent);
      transition: width 300ms linear;
    }

    .controls,
    .stats {
      display: flex;
      gap: 12px;
      justify-content: center;
      flex-wrap: wrap;
    }

    .stat {
      display: grid;
      text-align: center;
      min-width: 120px;
    }

    .label {
      font-size: 0.85rem;
      color: #6f6a65;
    }

    .value {
      font-size: 1.6rem;
      font-weight: 600;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 10px 22px;
      font-size: 1rem;
      cursor: pointer;
      background: var(--accent-2);
      color: white;
    }

    label {
      display: grid;
      gap: 6px;
    }

    #toasts {
      position: fixed;
      top: 16px;
      right: 16px;
      display: grid;
      gap: 8px;
    }

    .toast {
      padding: 10px 16px;
      border-radius: 12px;
      background: white;
      box-shadow: var(--shadow);
    }

    .toast[data-level="success"] { border-left: 4px solid #2d7a4b; }
    .toast[data-level="warning"] { border-left: 4px solid #d29b2b; }
    .toast[data-level="error"] { border-left: 4px solid #c63b2b; }
    .toast[data-level="info"] { border-left: 4px solid var(--accent-2); }
  </style>
</head>
<body>
  <main class="app">
    <div id="timer-display">{{DISPLAY}}</div>
    <div class="progress"><div id="progress-bar" style="width: {{PROGRESS}}%"></div></div>
    <section class="controls">
      <button id="start-btn" type="button">Start</button>
      <button id="pause-btn" type="button" hidden>Pause</button>
      <button id="reset-btn" type="button">Reset</button>
    </section>
    <section>
      <label>Duration
        <select id="duration-select">{{DURATION_OPTIONS}}</select>
      </label>
      <label>Skill
        <input id="skill-select" type="text" value="{{SKILL}}" />
      </label>
      <label>Notes
        <textarea id="session-notes" rows="2">{{NOTES}}</textarea>
      </label>
    </section>
    <section class="stats">
      <div class="stat"><span class="label">Sessions today</span><span id="sessions-today" class="value">{{SESSIONS}}</span></div>
      <div class="stat"><span class="label">Focus time</span><span id="focus-time-today" class="value">{{FOCUS}}m</span></div>
      <div class="stat"><span class="label">XP</span><span id="xp-today" class="value">{{XP}}</span></div>
    </section>
    <p class="label">Stats for {{DATE}} (local time).</p>
  </main>
  <div id="toasts"></div>
  <script>
    const displayEl = document.getElementById('timer-display');
    const progressEl = document.getElementById('progress-bar');
    const startBtn = document.getElementById('start-btn');
    const pauseBtn = document.getElementById('pause-btn');
    const resetBtn = document.getElementById('reset-btn');
    const durationEl = document.getElementById('duration-select');
    const skillEl = document.getElementById('skill-select');
    const notesEl = document.getElementById('session-notes');
    const toastsEl = document.getElementById('toasts');

    const renderTimer = (timer) => {
      displayEl.textContent = timer.display;
      progressEl.style.width = `${timer.progress_percent}%`;
      const running = timer.phase === 'running';
      startBtn.hidden = running;
      pauseBtn.hidden = !running;
    };

    const renderStats = (stats) => {
      document.getElementById('sessions-today').textContent = stats.sessions;
      document.getElementById('focus-time-today').textContent = `${stats.focus_time}m`;
      document.getElementById('xp-today').textContent = stats.xp;
    };

    const renderToasts = (notices) => {
      toastsEl.innerHTML = '';
      notices.forEach((notice) => {
        const el = document.createElement('div');
        el.className = 'toast';
        el.dataset.level = notice.level;
        el.textContent = notice.message;
        toastsEl.appendChild(el);
      });
    };

    const send = async (path, body) => {
      const response = await fetch(path, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body || {})
      });
      if (response.ok) {
        renderTimer(await response.json());
      }
    };

    const saveSelection = () =>
      send('/api/timer/selection', { skill_id: skillEl.value, notes: notesEl.value });

    startBtn.addEventListener('click', async () => {
      await saveSelection();
      await send('/api/timer/start');
    });
    pauseBtn.addEventListener('click', () => send('/api/timer/pause'));
    resetBtn.addEventListener('click', () => send('/api/timer/reset'));
    durationEl.addEventListener('change', () =>
      send('/api/timer/duration', { minutes: Number(durationEl.value) }));
    skillEl.addEventListener('change', saveSelection);
    notesEl.addEventListener('change', saveSelection);

    const poll = async () => {
      try {
        const [timer, stats, toasts] = await Promise.all([
          fetch('/api/timer').then((r) => r.json()),
          fetch('/api/stats/today').then((r) => r.json()),
          fetch('/api/notifications').then((r) => r.json())
        ]);
        renderTimer(timer);
        renderStats(stats);
        renderToasts(toasts.notices);
      } catch (err) {
        console.error('poll failed', err);
      }
    };

    poll();
    setInterval(poll, 1000);
  </script>
</body>
</html>
"#;
