// Mock casino application
//
// A single-page casino served by axum: header, side menu, promotion
// carousel, login / sign-up / wallet / cashier modals and an iframe card
// widget. Session and balance live in localStorage, so a saved storage state
// carries the member login across runs.

use axum::{Router, response::Html, routing::get};
use casino_test_utils::Result;
use std::net::SocketAddr;
use tokio::task::JoinHandle;

/// Starting balance of a freshly logged-in member, in cents
pub const MEMBER_START_BALANCE_CENTS: i64 = 100_00;

/// Number of slides in the promotion carousel
pub const PROMOTION_COUNT: usize = 3;

/// Handle to a running mock casino. The server stops when dropped.
pub struct MockCasino {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl MockCasino {
    /// Starts the app on a random free port
    pub async fn start() -> Result<Self> {
        Self::start_on(0).await
    }

    /// Starts the app on `port` (0 picks a free one)
    pub async fn start_on(port: u16) -> Result<Self> {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, router()).await {
                tracing::error!(error = %err, "mock casino stopped");
            }
        });
        tracing::info!(%addr, "mock casino listening");

        Ok(Self { addr, handle })
    }

    /// Base URL with a trailing slash, e.g. `http://127.0.0.1:38211/`
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}

impl Drop for MockCasino {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router() -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/payment-frame", get(payment_frame_page))
}

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn payment_frame_page() -> Html<&'static str> {
    Html(PAYMENT_FRAME_HTML)
}

const PAYMENT_FRAME_HTML: &str = r#"<!doctype html>
<html><head><meta charset="utf-8"><title>Card payment</title></head>
<body>
  <label>Card number <input id="card-number" inputmode="numeric" autocomplete="cc-number"></label>
  <label>Expiry <input id="card-expiry" placeholder="MM/YY"></label>
  <label>CVV <input id="card-cvv" inputmode="numeric"></label>
</body></html>
"#;

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Casino</title>
<style>
  .hidden { display: none !important; }
  .modal { position: fixed; top: 10%; left: 10%; right: 10%; background: #fff; border: 1px solid #333; padding: 16px; z-index: 10; }
  .slide { display: none; }
  .slide.active { display: block; }
  .carousel-indicator.active { background: gold; }
  .cashier-tab.active, .payment-method.active { font-weight: bold; }
  .field-error { color: #c00; }
  #side-menu { position: fixed; top: 0; left: 0; bottom: 0; width: 240px; background: #eee; z-index: 5; }
  nav[data-test="bottom-nav"] { position: fixed; bottom: 0; left: 0; right: 0; }
</style>
</head>
<body>
<header>
  <a data-test="logo" href="/">Casino</a>
  <button data-test="menu-button">Menu</button>
  <span data-test="guest-actions">
    <button data-test="login-button">Log in</button>
    <button data-test="register-button">Sign up</button>
  </span>
  <span data-test="member-actions" class="hidden">
    <span data-test="header-balance"></span>
    <button data-test="header-deposit">Deposit</button>
  </span>
</header>

<nav id="side-menu" data-test="side-menu" class="hidden">
  <button data-test="menu-close">Close</button>
  <a data-test="menu-home" href="/">Home</a>
  <a data-test="menu-casino" href="/#casino">Casino</a>
  <a data-test="menu-live" href="/#live">Live casino</a>
  <a data-test="menu-promotions" href="/#promotions">Promotions</a>
  <button data-test="menu-login" class="guest-only">Log in</button>
  <button data-test="menu-register" class="guest-only">Sign up</button>
  <button data-test="menu-deposit" class="member-only">Deposit</button>
  <button data-test="menu-withdraw" class="member-only">Withdraw</button>
  <button data-test="menu-logout" class="member-only">Log out</button>
</nav>

<section data-test="carousel">
  <button data-test="carousel-prev">Previous</button>
  <div class="slide active" data-test="slide-0"><h2>Welcome bonus</h2><p>100% up to €200</p></div>
  <div class="slide" data-test="slide-1"><h2>Free spins Friday</h2><p>50 spins every week</p></div>
  <div class="slide" data-test="slide-2"><h2>Live casino cashback</h2><p>10% back on live tables</p></div>
  <button data-test="carousel-next">Next</button>
  <div>
    <button class="carousel-indicator active" data-test="indicator-0">1</button>
    <button class="carousel-indicator" data-test="indicator-1">2</button>
    <button class="carousel-indicator" data-test="indicator-2">3</button>
  </div>
  <button data-test="promo-cta">Claim now</button>
</section>

<nav data-test="bottom-nav">
  <a data-test="bottom-nav-home" href="/">Home</a>
  <a data-test="bottom-nav-casino" href="/#casino">Casino</a>
  <button data-test="bottom-nav-cashier" class="member-only">Cashier</button>
  <span data-test="bottom-nav-balance" class="member-only"></span>
</nav>

<div data-test="login-modal" class="modal hidden">
  <h2>Log in</h2>
  <input id="login-username" placeholder="Username">
  <input id="login-password" type="password" placeholder="Password">
  <p data-test="login-error" class="field-error hidden">Enter your username and password</p>
  <button data-test="login-submit">Log in</button>
  <button data-test="login-close">Close</button>
</div>

<div data-test="registration-modal" class="modal hidden">
  <h2>Create your account</h2>
  <input id="signup-first-name" placeholder="First name">
  <p data-test="error-first-name" class="field-error hidden">First name is required</p>
  <input id="signup-last-name" placeholder="Last name">
  <p data-test="error-last-name" class="field-error hidden">Last name is required</p>
  <input id="signup-email" placeholder="Email">
  <p data-test="error-email" class="field-error hidden">Enter a valid email</p>
  <input id="signup-password" type="password" placeholder="Password">
  <p data-test="error-password" class="field-error hidden">At least 8 characters</p>
  <div data-test="signup-terms" role="checkbox" aria-checked="false" tabindex="0">I accept the terms</div>
  <button data-test="signup-submit" disabled>Create account</button>
  <button data-test="registration-close">Close</button>
</div>

<div data-test="wallet-modal" class="modal hidden">
  <h2>Your wallet</h2>
  <span data-test="wallet-balance"></span>
  <button data-test="wallet-deposit">Deposit</button>
  <button data-test="wallet-close">Close</button>
</div>

<div data-test="cashier-modal" class="modal hidden">
  <button class="cashier-tab active" data-test="cashier-tab-deposit">Deposit</button>
  <button class="cashier-tab" data-test="cashier-tab-withdraw">Withdraw</button>
  <p>Balance: <span data-test="cashier-balance"></span></p>
  <input id="cashier-amount" placeholder="Amount">
  <div>
    <button class="payment-method active" data-test="method-card">Card</button>
    <button class="payment-method" data-test="method-bank">Bank transfer</button>
    <button class="payment-method" data-test="method-skrill">Skrill</button>
  </div>
  <iframe name="payment-frame" data-test="payment-frame" src="/payment-frame"></iframe>
  <p data-test="cashier-error" class="field-error hidden"></p>
  <p data-test="cashier-success" class="hidden"></p>
  <button data-test="cashier-submit">Deposit</button>
  <button data-test="cashier-close">Close</button>
</div>

<script>
  const $ = (t) => document.querySelector(`[data-test="${t}"]`);
  const store = window.localStorage;
  const session = () => store.getItem('casino.session');
  const balance = () => parseInt(store.getItem('casino.balance') || '0', 10);
  const show = (t) => $(t).classList.remove('hidden');
  const hide = (t) => $(t).classList.add('hidden');

  function fmt(cents) {
    const sign = cents < 0 ? '-' : '';
    cents = Math.abs(cents);
    const whole = Math.floor(cents / 100).toString().replace(/\B(?=(\d{3})+(?!\d))/g, ',');
    return sign + '€' + whole + '.' + String(cents % 100).padStart(2, '0');
  }

  function render() {
    const member = !!session();
    $('guest-actions').classList.toggle('hidden', member);
    $('member-actions').classList.toggle('hidden', !member);
    document.querySelectorAll('.guest-only').forEach((e) => e.classList.toggle('hidden', member));
    document.querySelectorAll('.member-only').forEach((e) => e.classList.toggle('hidden', !member));
    const text = member ? fmt(balance()) : '';
    ['header-balance', 'bottom-nav-balance', 'cashier-balance', 'wallet-balance']
      .forEach((t) => { $(t).textContent = text; });
  }

  // Side menu
  $('menu-button').onclick = () => show('side-menu');
  $('menu-close').onclick = () => hide('side-menu');
  $('menu-logout').onclick = () => { store.removeItem('casino.session'); hide('side-menu'); render(); };

  // Carousel
  const slides = 3;
  let current = 0;
  function goTo(i) {
    current = (i + slides) % slides;
    for (let k = 0; k < slides; k++) {
      $('slide-' + k).classList.toggle('active', k === current);
      $('indicator-' + k).classList.toggle('active', k === current);
    }
  }
  $('carousel-next').onclick = () => goTo(current + 1);
  $('carousel-prev').onclick = () => goTo(current - 1);
  for (let k = 0; k < slides; k++) { $('indicator-' + k).onclick = () => goTo(k); }

  // Promotion call to action: registration for guests, wallet for members
  $('promo-cta').onclick = () => session() ? show('wallet-modal') : show('registration-modal');
  $('wallet-close').onclick = () => hide('wallet-modal');

  // Login
  const openLogin = () => { hide('side-menu'); show('login-modal'); };
  $('login-button').onclick = openLogin;
  $('menu-login').onclick = openLogin;
  $('login-close').onclick = () => hide('login-modal');
  $('login-submit').onclick = () => {
    const user = document.getElementById('login-username').value.trim();
    const pass = document.getElementById('login-password').value;
    if (!user || !pass) { show('login-error'); return; }
    store.setItem('casino.session', user);
    if (store.getItem('casino.balance') === null) { store.setItem('casino.balance', '10000'); }
    hide('login-error');
    hide('login-modal');
    render();
  };

  // Sign-up
  const fields = {
    'first-name': (v) => v.trim() !== '',
    'last-name': (v) => v.trim() !== '',
    'email': (v) => /^[^@\s]+@[^@\s]+\.[^@\s]+$/.test(v.trim()),
    'password': (v) => v.length >= 8,
  };
  const touched = {};
  function validateSignUp() {
    let ok = true;
    for (const [name, valid] of Object.entries(fields)) {
      const good = valid(document.getElementById('signup-' + name).value);
      $('error-' + name).classList.toggle('hidden', good || !touched[name]);
      ok = ok && good;
    }
    ok = ok && $('signup-terms').getAttribute('aria-checked') === 'true';
    $('signup-submit').disabled = !ok;
  }
  for (const name of Object.keys(fields)) {
    const input = document.getElementById('signup-' + name);
    input.addEventListener('input', validateSignUp);
    input.addEventListener('blur', () => { touched[name] = true; validateSignUp(); });
  }
  $('signup-terms').onclick = () => {
    const checked = $('signup-terms').getAttribute('aria-checked') === 'true';
    $('signup-terms').setAttribute('aria-checked', checked ? 'false' : 'true');
    validateSignUp();
  };
  const openSignUp = () => { hide('side-menu'); show('registration-modal'); };
  $('register-button').onclick = openSignUp;
  $('menu-register').onclick = openSignUp;
  $('registration-close').onclick = () => hide('registration-modal');
  $('signup-submit').onclick = () => {
    store.setItem('casino.session', document.getElementById('signup-email').value.trim());
    store.setItem('casino.balance', '0');
    hide('registration-modal');
    render();
  };

  // Cashier
  let tab = 'deposit';
  let method = 'card';
  function syncCashier() {
    $('cashier-tab-deposit').classList.toggle('active', tab === 'deposit');
    $('cashier-tab-withdraw').classList.toggle('active', tab === 'withdraw');
    for (const m of ['card', 'bank', 'skrill']) {
      $('method-' + m).classList.toggle('active', m === method);
    }
    $('payment-frame').classList.toggle('hidden', !(tab === 'deposit' && method === 'card'));
    $('cashier-submit').textContent = tab === 'deposit' ? 'Deposit' : 'Withdraw';
  }
  function openCashier(which) {
    tab = which;
    hide('side-menu');
    hide('wallet-modal');
    hide('cashier-success');
    hide('cashier-error');
    syncCashier();
    render();
    show('cashier-modal');
  }
  $('header-deposit').onclick = () => openCashier('deposit');
  $('bottom-nav-cashier').onclick = () => openCashier('deposit');
  $('wallet-deposit').onclick = () => openCashier('deposit');
  $('menu-deposit').onclick = () => openCashier('deposit');
  $('menu-withdraw').onclick = () => openCashier('withdraw');
  $('cashier-close').onclick = () => hide('cashier-modal');
  $('cashier-tab-deposit').onclick = () => { tab = 'deposit'; syncCashier(); };
  $('cashier-tab-withdraw').onclick = () => { tab = 'withdraw'; syncCashier(); };
  for (const m of ['card', 'bank', 'skrill']) {
    $('method-' + m).onclick = () => { method = m; syncCashier(); };
  }
  function fail(message) {
    $('cashier-error').textContent = message;
    show('cashier-error');
    hide('cashier-success');
  }
  $('cashier-submit').onclick = () => {
    const raw = document.getElementById('cashier-amount').value.trim();
    if (!/^\d+(\.\d{1,2})?$/.test(raw)) { fail('Enter a valid amount'); return; }
    const cents = Math.round(parseFloat(raw) * 100);
    if (cents <= 0) { fail('Enter a valid amount'); return; }
    if (tab === 'deposit') {
      if (method === 'card') {
        const doc = $('payment-frame').contentDocument;
        const number = doc ? doc.getElementById('card-number').value.replace(/\D/g, '') : '';
        if (number.length < 12) { fail('Card number is invalid'); return; }
      }
      store.setItem('casino.balance', String(balance() + cents));
      $('cashier-success').textContent = 'Deposit successful';
    } else {
      if (cents > balance()) { fail('Insufficient funds'); return; }
      store.setItem('casino.balance', String(balance() - cents));
      $('cashier-success').textContent = 'Withdrawal successful';
    }
    document.getElementById('cashier-amount').value = '';
    hide('cashier-error');
    show('cashier-success');
    render();
  };

  render();
  syncCashier();
</script>
</body>
</html>
"#;
